use image::{Rgb, RgbImage};
use ndarray::{ArrayView, IxDyn};

use crate::detection::image_buffer::ImageBuffer;

/// An owned image: contiguous bytes in row-major order, either gray
/// (1 channel) or interleaved BGR (3 channels). Other channel counts are
/// rejected at construction in debug builds.
///
/// BGR is the byte order the native library expects for color input, so
/// conversion from the `image` crate's RGB happens once at load time.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert!(
            channels == 1 || channels == 3,
            "channels must be 1 (gray) or 3 (BGR), got {channels}"
        );
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// `(height, width)` for gray frames, `(height, width, 3)` otherwise.
    pub fn as_image_buffer(&self) -> ImageBuffer<'_> {
        let view = ArrayView::from_shape(IxDyn(&self.shape()), self.data.as_slice())
            .expect("Frame data length must match dimensions");
        ImageBuffer::U8(view)
    }

    /// Converts back to RGB for drawing and saving.
    pub fn to_rgb_image(&self) -> RgbImage {
        let channels = self.channels as usize;
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = (y as usize * width + x as usize) * channels;
            if channels == 1 {
                let v = self.data[i];
                Rgb([v, v, v])
            } else {
                Rgb([self.data[i + 2], self.data[i + 1], self.data[i]])
            }
        })
    }

    fn shape(&self) -> Vec<usize> {
        let (h, w) = (self.height as usize, self.width as usize);
        if self.channels == 1 {
            vec![h, w]
        } else {
            vec![h, w, self.channels as usize]
        }
    }
}
