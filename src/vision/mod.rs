//! Vision/OCR Layer
//!
//! Detection data returned by the scan service. Bounding boxes are expressed
//! in the pixel space of the full-resolution image that was scanned.

pub mod ocr;

use serde::{Deserialize, Serialize};

pub use ocr::{FixtureScanner, HttpScanner, ScanError, Scanner};

/// Axis-aligned bounding box in natural-image pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Whether `min <= max` holds on both axes
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

/// Single classifier result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    /// Recognized label
    pub label: String,
    /// Confidence reported by the classifier (passed through, never interpreted)
    #[serde(default)]
    pub probability: f32,
    /// Location of the label in the scanned image
    pub bounding_box: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, probability: f32, bounding_box: BoundingBox) -> Self {
        Self {
            label: label.into(),
            probability,
            bounding_box,
        }
    }
}

/// Detections in classifier response order
pub type DetectionList = Vec<Detection>;

/// Payload returned by a scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub probabilities: DetectionList,
}
