//! HTTP service that runs a YOLOv8 detector over uploaded images and returns
//! them annotated: bordered, boxed and labelled with configurable styling.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
