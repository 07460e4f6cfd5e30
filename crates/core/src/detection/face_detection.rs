use ndarray::{Array2, ArrayView1};
use serde::Serialize;

use crate::shared::constants::DETECTION_FIELDS;

/// One face found by the native detector, in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub confidence: f32,
}

impl Detection {
    /// Builds a detection from a `[x, y, w, h, confidence, ..]` row.
    ///
    /// Returns `None` if the row is shorter than five values.
    pub fn from_row(row: ArrayView1<'_, f32>) -> Option<Self> {
        if row.len() < DETECTION_FIELDS {
            return None;
        }
        Some(Self {
            x: row[0],
            y: row[1],
            w: row[2],
            h: row[3],
            confidence: row[4],
        })
    }

    pub fn to_row(&self) -> [f32; DETECTION_FIELDS] {
        [self.x, self.y, self.w, self.h, self.confidence]
    }

    /// Inclusive right edge.
    pub fn right(&self) -> f32 {
        self.x + self.w - 1.0
    }

    /// Inclusive bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h - 1.0
    }
}

/// Stacks detections into an `(n, 5)` array, preserving order.
pub fn detections_to_array(detections: &[Detection]) -> Array2<f32> {
    Array2::from_shape_fn((detections.len(), DETECTION_FIELDS), |(i, j)| {
        detections[i].to_row()[j]
    })
}
