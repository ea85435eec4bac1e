pub mod dto;
pub mod ports;
pub mod registry;
pub mod services;
