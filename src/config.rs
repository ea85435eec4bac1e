use clap::Parser;
use std::path::PathBuf;

use crate::domain::model::{ModelName, YoloParams};
use crate::domain::style::defaults;

/// Command-line / environment configuration of the API server.
#[derive(Parser, Debug, Clone)]
#[command(name = "yolo-annotate-api", version, about = "HTTP API that draws YOLOv8 detections onto uploaded images")]
pub struct ServerConfig {
    #[arg(long, env = "YOLO_API_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "YOLO_API_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory holding `yolov8{n,s,m,l,x}.onnx`
    #[arg(long, env = "YOLO_MODELS_DIR", default_value = "models")]
    pub models_dir: PathBuf,

    #[arg(long, env = "YOLO_DEFAULT_MODEL", default_value = "yolov8n", value_parser = parse_model_name)]
    pub default_model: ModelName,

    /// TTF/OTF used for labels; common system fonts, then a bundled one, are tried otherwise
    #[arg(long, env = "YOLO_FONT_PATH")]
    pub font_path: Option<PathBuf>,

    /// Browser UI assets
    #[arg(long, env = "YOLO_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    #[arg(long, env = "YOLO_INPUT_SIZE", default_value_t = 640)]
    pub input_size: u32,

    /// Detector-side confidence floor, applied before NMS
    #[arg(long, env = "YOLO_CONF_FLOOR", default_value_t = 0.25)]
    pub conf_floor: f32,

    #[arg(long, env = "YOLO_IOU_THRESHOLD", default_value_t = 0.45)]
    pub iou_threshold: f32,

    #[arg(long, env = "YOLO_MAX_DETECTIONS", default_value_t = 300)]
    pub max_detections: usize,

    #[arg(long, env = "YOLO_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    #[arg(long, env = "YOLO_JPEG_QUALITY", default_value_t = defaults::JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    #[arg(long, env = "YOLO_MAX_UPLOAD_MB", default_value_t = 20)]
    pub max_upload_mb: usize,
}

fn parse_model_name(raw: &str) -> Result<ModelName, String> {
    raw.parse().map_err(|e: crate::domain::errors::DomainError| e.to_string())
}

impl ServerConfig {
    pub fn yolo_params(&self) -> YoloParams {
        YoloParams {
            input_size: self.input_size,
            conf_threshold: self.conf_floor,
            iou_threshold: self.iou_threshold,
            max_detections: self.max_detections,
            intra_threads: self.intra_threads,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
