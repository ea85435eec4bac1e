use anyhow::Result;
use image::{imageops::FilterType, RgbImage};
use ndarray::{s, Array4, ArrayView2, ArrayViewD, Axis, IxDyn};
use ort::session::Session;
use ort::value::Value;
use std::fs;
use tracing::debug;

use crate::application::ports::{DetectorLoaderPort, DetectorPort};
use crate::domain::detection::Detection;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelId, YoloParams};

pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich",
    "orange", "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch",
    "potted plant", "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote",
    "keyboard", "cell phone", "microwave", "oven", "toaster", "sink", "refrigerator", "book",
    "clock", "vase", "scissors", "teddy bear", "hair drier", "toothbrush",
];

pub struct OnnxYoloEngine {
    session: Session,
    params: YoloParams,
}

impl OnnxYoloEngine {
    pub fn load(path: &str, params: &YoloParams) -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = Session::builder()?.with_intra_threads(params.intra_threads.max(1))?;

        // CUDA is optional: registered when built with the feature, CPU otherwise.
        #[cfg(feature = "cuda")]
        {
            let cuda = ort::execution_providers::CUDAExecutionProvider::default().build();
            if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
                builder = builder_with_cuda;
            }
        }

        let model_bytes = fs::read(path)?;
        let session = builder.commit_from_memory(&model_bytes)?;

        Ok(Self { session, params: params.clone() })
    }

    pub fn infer(&mut self, rgb: &RgbImage) -> Result<Vec<Detection>> {
        let imgsz = self.params.input_size as usize;
        let resized = image::imageops::resize(rgb, imgsz as u32, imgsz as u32, FilterType::Triangle);

        let mut input = Array4::<f32>::zeros((1, 3, imgsz, imgsz));
        for (x, y, pixel) in resized.enumerate_pixels() {
            input[[0, 0, y as usize, x as usize]] = pixel[0] as f32 / 255.0;
            input[[0, 1, y as usize, x as usize]] = pixel[1] as f32 / 255.0;
            input[[0, 2, y as usize, x as usize]] = pixel[2] as f32 / 255.0;
        }

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let (raw, _) = input.into_raw_vec_and_offset();
        let input_tensor = Value::from_array((input_shape, raw))?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view
            .index_axis(Axis(0), 0)
            .into_dimensionality::<ndarray::Ix2>()?;

        let scale = (
            rgb.width() as f32 / imgsz as f32,
            rgb.height() as f32 / imgsz as f32,
        );
        let detections = decode_predictions(view, scale, (rgb.width(), rgb.height()), &self.params);
        debug!("{} candidates, {} detections after NMS", dims.get(2).copied().unwrap_or(0), detections.len());
        Ok(detections)
    }
}

impl DetectorPort for OnnxYoloEngine {
    fn detect(&mut self, image: &RgbImage) -> DomainResult<Vec<Detection>> {
        self.infer(image)
            .map_err(|e| DomainError::OperationFailed(format!("inference failed: {}", e)))
    }
}

/// Builds [`OnnxYoloEngine`]s for the model registry.
pub struct OnnxYoloLoader;

impl OnnxYoloLoader {
    pub fn new() -> Self { Self }
}

impl DetectorLoaderPort for OnnxYoloLoader {
    fn load(&self, model: &ModelId, params: &YoloParams) -> DomainResult<Box<dyn DetectorPort>> {
        let engine = OnnxYoloEngine::load(&model.onnx_path, params).map_err(|e| {
            DomainError::OperationFailed(format!("could not load {}: {}", model.onnx_path, e))
        })?;
        Ok(Box::new(engine))
    }
}

/// Turns a YOLOv8 output `[4 + classes, candidates]` into detections in
/// source-image pixels. `scale` maps network pixels to source pixels.
pub fn decode_predictions(
    view: ArrayView2<f32>,
    scale: (f32, f32),
    bounds: (u32, u32),
    params: &YoloParams,
) -> Vec<Detection> {
    let (sx, sy) = scale;
    let (max_x, max_y) = (bounds.0 as f32, bounds.1 as f32);
    let num_candidates = view.shape()[1];

    let mut detections = Vec::new();
    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let Some((class_id, &max_score)) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
        else {
            continue;
        };

        if max_score < params.conf_threshold {
            continue;
        }

        let cx = view[[0, i]];
        let cy = view[[1, i]];
        let w = view[[2, i]];
        let h = view[[3, i]];

        let x1 = ((cx - w / 2.0) * sx).clamp(0.0, max_x);
        let y1 = ((cy - h / 2.0) * sy).clamp(0.0, max_y);
        let x2 = ((cx + w / 2.0) * sx).clamp(0.0, max_x);
        let y2 = ((cy + h / 2.0) * sy).clamp(0.0, max_y);
        if x2 <= x1 || y2 <= y1 {
            continue;
        }

        detections.push(Detection {
            x1,
            y1,
            x2,
            y2,
            score: max_score,
            class_id,
            label: COCO_CLASSES.get(class_id).copied().unwrap_or("object").to_string(),
        });
    }

    non_max_suppression(detections, params.iou_threshold, params.max_detections)
}

/// Class-aware NMS, highest score first.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32, max_detections: usize) -> Vec<Detection> {
    detections.sort_unstable_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Detection> = Vec::new();
    for det in detections {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept
            .iter()
            .any(|k| k.class_id == det.class_id && k.iou(&det) > iou_threshold);
        if !suppressed {
            kept.push(det);
        }
    }
    kept
}
