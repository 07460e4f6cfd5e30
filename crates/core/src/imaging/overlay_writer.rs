use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::detection::face_detection::Detection;
use crate::shared::error::{Bd17Error, Result};
use crate::shared::frame::Frame;

const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const BOX_THICKNESS: u32 = 2;

/// Writes `frame` to `path` with a box drawn around every detection.
pub fn write_overlay(path: &Path, frame: &Frame, detections: &[Detection]) -> Result<()> {
    let write_error = |source| Bd17Error::ImageWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| write_error(image::ImageError::IoError(e)))?;
    }

    let mut canvas = frame.to_rgb_image();
    for detection in detections {
        draw_box(&mut canvas, detection);
    }
    canvas.save(path).map_err(write_error)
}

/// Box from `(x, y)` to `(x + w - 1, y + h - 1)`, growing inward.
///
/// Coordinates are whatever the native library reported, so edges are
/// clamped to one pixel past the canvas and boxes fully outside are skipped.
fn draw_box(canvas: &mut RgbImage, detection: &Detection) {
    let left = detection.x.round() as i64;
    let top = detection.y.round() as i64;
    let w = detection.w.round().max(0.0) as i64;
    let h = detection.h.round().max(0.0) as i64;
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));

    for inset in 0..i64::from(BOX_THICKNESS) {
        let l = left.saturating_add(inset);
        let t = top.saturating_add(inset);
        let r = left.saturating_add(w).saturating_sub(1 + inset);
        let b = top.saturating_add(h).saturating_sub(1 + inset);
        if r < l || b < t || r < 0 || b < 0 || l >= width || t >= height {
            break;
        }

        let (l, t) = (l.max(-1), t.max(-1));
        let (r, b) = (r.min(width), b.min(height));
        let rect = Rect::at(l as i32, t as i32).of_size((r - l + 1) as u32, (b - t + 1) as u32);
        draw_hollow_rect_mut(canvas, rect, BOX_COLOR);
    }
}
