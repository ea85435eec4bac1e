use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One predicted object, in source-image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub score: f32,
    pub class_id: usize,
    pub label: String,
}

impl Detection {
    /// Text drawn next to the box, e.g. `"dog 0.87"`.
    pub fn caption(&self) -> String {
        format!("{} {:.2}", self.label, self.score)
    }

    /// Integer corners shifted into a canvas padded by `offset` pixels.
    /// Coordinates are truncated before the shift.
    pub fn translated(&self, offset: i32) -> (i32, i32, i32, i32) {
        (
            self.x1 as i32 + offset,
            self.y1 as i32 + offset,
            self.x2 as i32 + offset,
            self.y2 as i32 + offset,
        )
    }

    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &Detection) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

/// Detections at or above `min_confidence`; the bound is inclusive.
pub fn visible_detections(
    detections: &[Detection],
    min_confidence: f32,
) -> impl Iterator<Item = &Detection> {
    detections.iter().filter(move |d| d.score >= min_confidence)
}

/// "2 person, 1 dog" style summary for logs. Labels are listed alphabetically.
pub fn summarize_detections(detections: &[Detection]) -> String {
    let mut counts = BTreeMap::new();
    for det in detections {
        *counts.entry(det.label.as_str()).or_insert(0usize) += 1;
    }
    counts
        .iter()
        .map(|(label, count)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
}
