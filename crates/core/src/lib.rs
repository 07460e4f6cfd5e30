//! Binding to the closed-source brodmann17 face detection library.
//!
//! The native library is loaded once per process from
//! `<install-dir>/../lib/<arch>/`. Each [`Detector`] owns one native
//! detector instance and releases it on [`Detector::release`] or drop.
//!
//! ```no_run
//! use bd17_core::Detector;
//! use ndarray::Array3;
//!
//! let image = Array3::<u8>::zeros((480, 640, 3));
//! let mut detector = Detector::create()?;
//! detector.rotate(90)?;
//! for face in detector.detect(&image)? {
//!     println!("{} {} {} {} {}", face.x, face.y, face.w, face.h, face.confidence);
//! }
//! detector.release()?;
//! # Ok::<(), bd17_core::Bd17Error>(())
//! ```

pub mod detection;
pub mod imaging;
pub mod native;
pub mod shared;

pub use detection::detector::Detector;
pub use detection::face_detection::Detection;
pub use detection::image_buffer::ImageBuffer;
pub use detection::rotation::Rotation;
pub use shared::error::{Bd17Error, Result};
