use std::path::Path;

use image::DynamicImage;

use crate::shared::error::{Bd17Error, Result};
use crate::shared::frame::Frame;

/// Pixel layout to decode into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Interleaved BGR, the channel order OpenCV's `imread` produces.
    #[default]
    Bgr,
    Gray,
}

/// Decodes an image file into a [`Frame`] ready for detection.
pub fn read_frame(path: &Path, mode: ColorMode) -> Result<Frame> {
    let img = image::open(path).map_err(|source| Bd17Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(frame_from_image(&img, mode))
}

pub fn frame_from_image(img: &DynamicImage, mode: ColorMode) -> Frame {
    match mode {
        ColorMode::Gray => {
            let luma = img.to_luma8();
            let (w, h) = luma.dimensions();
            Frame::new(luma.into_raw(), w, h, 1)
        }
        ColorMode::Bgr => {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            let mut data = rgb.into_raw();
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
            Frame::new(data, w, h, 3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_test_png(dir: &Path) -> std::path::PathBuf {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        let path = dir.join("input.png");
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_read_bgr_frame() {
        let tmp = TempDir::new().unwrap();
        let path = write_test_png(tmp.path());

        let frame = read_frame(&path, ColorMode::Bgr).unwrap();

        assert_eq!((frame.width(), frame.height(), frame.channels()), (3, 2, 3));
        // Red pixel is stored as B, G, R
        assert_eq!(&frame.data()[..3], &[0, 0, 255]);
        // Blue pixel at (2, 1)
        let i = (3 + 2) * 3;
        assert_eq!(&frame.data()[i..i + 3], &[255, 0, 0]);
    }

    #[test]
    fn test_read_gray_frame() {
        let tmp = TempDir::new().unwrap();
        let path = write_test_png(tmp.path());

        let frame = read_frame(&path, ColorMode::Gray).unwrap();

        assert_eq!(frame.channels(), 1);
        assert_eq!(frame.data().len(), 6);
        assert_eq!(frame.as_image_buffer().shape(), &[2, 3]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.png");
        let err = read_frame(&path, ColorMode::Bgr).unwrap_err();
        assert!(matches!(err, Bd17Error::ImageRead { .. }));
    }

    #[test]
    fn test_default_mode_is_bgr() {
        assert_eq!(ColorMode::default(), ColorMode::Bgr);
    }
}
