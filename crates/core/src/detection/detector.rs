use std::sync::Arc;

use crate::detection::face_detection::Detection;
use crate::detection::image_buffer::{ImageBuffer, ImageLayout};
use crate::detection::rotation::Rotation;
use crate::native::domain::native_api::{
    DetectionBuffers, NativeApi, NativeHandle, NativeImage,
};
use crate::native::infrastructure::native_library;
use crate::shared::constants::DEFAULT_MAX_DETECTIONS;
use crate::shared::error::{Bd17Error, Result};

/// Owns one native detector instance.
///
/// The handle is destroyed by [`Detector::release`] or, failing that, when
/// the detector goes out of scope. After release every operation fails
/// with [`Bd17Error::DetectorReleased`] and nothing is passed to the
/// native library.
///
/// All calls block. A `Detector` can move between threads but is not meant
/// to be shared: operations take `&mut self`, and the native library makes
/// no thread-safety promises for a single instance. Distinct detectors
/// share the process-wide library without locking.
pub struct Detector {
    api: Arc<dyn NativeApi>,
    handle: Option<NativeHandle>,
}

impl Detector {
    /// Creates a detector on the process-wide library, loading and
    /// initializing it on first use.
    pub fn create() -> Result<Self> {
        Self::create_with(native_library::global()?)
    }

    /// Creates a detector through an already-initialized native API.
    pub fn create_with<A: NativeApi + 'static>(api: Arc<A>) -> Result<Self> {
        let api: Arc<dyn NativeApi> = api;
        let handle = api.create_detector().ok_or(Bd17Error::CreationError)?;
        log::debug!("Created native detector {:p}", handle.as_ptr());
        Ok(Self {
            api,
            handle: Some(handle),
        })
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    /// Sets the detector orientation to `angle_degrees` (0, 90, 180 or 270).
    ///
    /// The orientation is absolute: `rotate(90)` twice leaves the detector
    /// at 90°. No rotation state is kept here.
    pub fn rotate(&mut self, angle_degrees: i32) -> Result<()> {
        let rotation = Rotation::try_from(angle_degrees)?;
        self.rotate_to(rotation)
    }

    pub fn rotate_to(&mut self, rotation: Rotation) -> Result<()> {
        let handle = self.handle()?;
        if !self.api.rotate(handle, rotation.quadrant()) {
            return Err(Bd17Error::RotationError);
        }
        log::debug!("Rotated detector to {rotation}");
        Ok(())
    }

    /// Detects faces with room for up to 10000 results.
    pub fn detect<'a>(&mut self, image: impl Into<ImageBuffer<'a>>) -> Result<Vec<Detection>> {
        self.detect_with_limit(image, DEFAULT_MAX_DETECTIONS)
    }

    /// Detects faces in a `uint8` image of shape `(h, w)` or `(h, w, c)` with
    /// `c` in {1, 3}.
    ///
    /// Results keep the native library's order, capped at `max_detections`.
    pub fn detect_with_limit<'a>(
        &mut self,
        image: impl Into<ImageBuffer<'a>>,
        max_detections: usize,
    ) -> Result<Vec<Detection>> {
        let max_detections = validate_max_detections(max_detections)?;
        let image: ImageBuffer<'a> = image.into();
        let view = match image {
            ImageBuffer::U8(view) => view,
            other => return Err(Bd17Error::InvalidImageType(other.element_type().to_string())),
        };
        let layout = ImageLayout::from_shape(view.shape())?;
        let handle = self.handle()?;

        // The native side reads raw row-major bytes.
        let contiguous = view.as_standard_layout();
        let data = contiguous
            .as_slice()
            .ok_or_else(|| Bd17Error::InvalidImageShape(view.shape().to_vec()))?;
        let image = NativeImage {
            data,
            width: layout.width,
            height: layout.height,
            format: layout.format,
        };

        let mut buffers = DetectionBuffers::new(max_detections);
        if !self.api.detect(handle, &image, &mut buffers) {
            return Err(Bd17Error::DetectionError);
        }

        let detections: Vec<Detection> = buffers
            .reported()
            .rows()
            .into_iter()
            .filter_map(Detection::from_row)
            .collect();
        log::debug!(
            "Detected {} faces in {}x{} image",
            detections.len(),
            layout.width,
            layout.height
        );
        Ok(detections)
    }

    /// Destroys the native detector.
    ///
    /// The handle is given up even if the library reports failure, so a
    /// second call returns [`Bd17Error::DetectorReleased`] instead of
    /// touching freed native state.
    pub fn release(&mut self) -> Result<()> {
        let handle = self.handle.take().ok_or(Bd17Error::DetectorReleased)?;
        log::debug!("Destroying native detector {:p}", handle.as_ptr());
        if self.api.destroy_detector(handle) {
            Ok(())
        } else {
            Err(Bd17Error::DeallocationError)
        }
    }

    fn handle(&self) -> Result<&NativeHandle> {
        self.handle.as_ref().ok_or(Bd17Error::DetectorReleased)
    }
}

impl Drop for Detector {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.release() {
                log::warn!("Failed to release detector on drop: {e}");
            }
        }
    }
}

fn validate_max_detections(max_detections: usize) -> Result<u32> {
    match u32::try_from(max_detections) {
        Ok(0) => Err(Bd17Error::InvalidArgument(
            "max_detections must be a positive integer".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(Bd17Error::InvalidArgument(format!(
            "max_detections must not exceed {}, got {max_detections}",
            u32::MAX
        ))),
    }
}
