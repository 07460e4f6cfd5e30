use std::fmt;

use ndarray::{Array, ArrayView, ArrayViewD, Dimension};

use crate::native::domain::native_api::ImageFormat;
use crate::shared::error::{Bd17Error, Result};

/// Sample type of an [`ImageBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    U8,
    U16,
    F32,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "uint8",
            Self::U16 => "uint16",
            Self::F32 => "float32",
        };
        f.write_str(name)
    }
}

/// Borrowed image in `(height, width)` or `(height, width, channels)` layout.
///
/// The element type is carried at runtime so that a caller holding, say, a
/// float image gets [`Bd17Error::InvalidImageType`] rather than a silent
/// reinterpretation. Only `U8` images reach the native library.
#[derive(Clone, Debug)]
pub enum ImageBuffer<'a> {
    U8(ArrayViewD<'a, u8>),
    U16(ArrayViewD<'a, u16>),
    F32(ArrayViewD<'a, f32>),
}

impl ImageBuffer<'_> {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::U8(_) => ElementType::U8,
            Self::U16(_) => ElementType::U16,
            Self::F32(_) => ElementType::F32,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::U8(v) => v.shape(),
            Self::U16(v) => v.shape(),
            Self::F32(v) => v.shape(),
        }
    }
}

macro_rules! impl_from_array {
    ($elem:ty, $variant:ident) => {
        impl<'a, D: Dimension> From<ArrayView<'a, $elem, D>> for ImageBuffer<'a> {
            fn from(view: ArrayView<'a, $elem, D>) -> Self {
                ImageBuffer::$variant(view.into_dyn())
            }
        }

        impl<'a, D: Dimension> From<&'a Array<$elem, D>> for ImageBuffer<'a> {
            fn from(array: &'a Array<$elem, D>) -> Self {
                ImageBuffer::$variant(array.view().into_dyn())
            }
        }
    };
}

impl_from_array!(u8, U8);
impl_from_array!(u16, U16);
impl_from_array!(f32, F32);

/// Geometry and native format derived from an image's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageLayout {
    pub width: i32,
    pub height: i32,
    pub channels: usize,
    pub format: ImageFormat,
}

impl ImageLayout {
    /// 2-D shapes are single-channel; 3-D shapes take the trailing axis
    /// as the channel count.
    pub fn from_shape(shape: &[usize]) -> Result<Self> {
        let (height, width, channels) = match *shape {
            [h, w] => (h, w, 1),
            [h, w, c] => (h, w, c),
            _ => return Err(Bd17Error::InvalidImageShape(shape.to_vec())),
        };
        let format = ImageFormat::from_channels(channels)?;
        let to_int = |v: usize| {
            i32::try_from(v).map_err(|_| Bd17Error::InvalidImageShape(shape.to_vec()))
        };
        Ok(Self {
            width: to_int(width)?,
            height: to_int(height)?,
            channels,
            format,
        })
    }
}
