use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

/// The fixed set of detectors the service can serve: the five YOLOv8 sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Yolov8n,
    Yolov8s,
    Yolov8m,
    Yolov8l,
    Yolov8x,
}

impl ModelName {
    pub const ALL: [ModelName; 5] = [
        ModelName::Yolov8n,
        ModelName::Yolov8s,
        ModelName::Yolov8m,
        ModelName::Yolov8l,
        ModelName::Yolov8x,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Yolov8n => "yolov8n",
            ModelName::Yolov8s => "yolov8s",
            ModelName::Yolov8m => "yolov8m",
            ModelName::Yolov8l => "yolov8l",
            ModelName::Yolov8x => "yolov8x",
        }
    }

    /// Weights file name inside the models directory.
    pub fn file_name(&self) -> String {
        format!("{}.onnx", self.as_str())
    }
}

impl Default for ModelName {
    fn default() -> Self {
        ModelName::Yolov8n
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelName::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownModel {
                name: s.to_string(),
                expected: ModelName::ALL.map(|m| m.as_str()).join(", "),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: ModelName,
    pub onnx_path: String,  // filesystem path
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,        // 640 typical
    pub conf_threshold: f32,    // 0..1, floor applied before NMS
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,  // e.g. 300
    pub intra_threads: usize,
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            iou_threshold: 0.45,
            max_detections: 300,
            intra_threads: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_name() {
        for name in ModelName::ALL {
            assert_eq!(name.as_str().parse::<ModelName>().unwrap(), name);
        }
        assert_eq!(" YOLOv8S ".parse::<ModelName>().unwrap(), ModelName::Yolov8s);
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "yolov5n".parse::<ModelName>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownModel { ref name, .. } if name == "yolov5n"));
        assert!(err.to_string().contains("yolov8x"));
    }

    #[test]
    fn weights_file_follows_name() {
        assert_eq!(ModelName::Yolov8m.file_name(), "yolov8m.onnx");
    }
}
