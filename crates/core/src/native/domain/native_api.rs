use std::ffi::c_void;
use std::ptr::NonNull;

use ndarray::{s, Array2, ArrayView2};

use crate::shared::constants::{DETECTION_FIELDS, PARAMS_PER_DETECTION};
use crate::shared::error::{Bd17Error, Result};

/// The native library's entry points, expressed with safe Rust types.
///
/// Every method returns the raw success flag; mapping a `false` to a typed
/// error is the caller's job. Implementations must not retry.
pub trait NativeApi: Send + Sync {
    /// One-time library bring-up.
    fn init(&self) -> bool;

    /// Allocates detector state. `None` means the library returned null.
    fn create_detector(&self) -> Option<NativeHandle>;

    /// Frees detector state. The handle is consumed whether or not the
    /// library reports success.
    fn destroy_detector(&self, handle: NativeHandle) -> bool;

    /// Sets the absolute orientation; `quadrant` is in `0..4`.
    fn rotate(&self, handle: &NativeHandle, quadrant: u32) -> bool;

    fn detect(
        &self,
        handle: &NativeHandle,
        image: &NativeImage<'_>,
        out: &mut DetectionBuffers,
    ) -> bool;
}

/// Opaque pointer to detector state living inside the native library.
///
/// Not `Clone`: exactly one owner may pass it back across the boundary.
#[derive(Debug)]
pub struct NativeHandle(NonNull<c_void>);

// Safety: the handle is an address the binding never dereferences. Detector
// methods take `&mut self`, so a handle is only ever used from one thread
// at a time.
unsafe impl Send for NativeHandle {}

impl NativeHandle {
    /// Wraps a pointer returned by `CreateDetector`; null yields `None`.
    ///
    /// # Safety
    ///
    /// `ptr` must either come from `CreateDetector` of the library this handle
    /// will be passed back to and not be owned by another handle, or be a
    /// token for an implementation that never dereferences it.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Pixel layouts understood by the native library (`bd17_image_format_t`).
///
/// Only the byte formats are reachable from [`crate::Detector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum ImageFormat {
    /// OpenCV-style interleaved BGR bytes.
    BgrInterleavedByte = 1,
    GrayByte = 2,
}

impl ImageFormat {
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(Self::GrayByte),
            3 => Ok(Self::BgrInterleavedByte),
            other => Err(Bd17Error::UnsupportedChannelCount(other)),
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Row-major image bytes plus the geometry the native call expects.
#[derive(Debug)]
pub struct NativeImage<'a> {
    pub data: &'a [u8],
    pub width: i32,
    pub height: i32,
    pub format: ImageFormat,
}

/// Fixed-capacity output buffers handed to the native `Detect` call.
///
/// The detection buffer starts filled with ones and the count with zero;
/// only the first `count` rows are meaningful afterwards.
#[derive(Debug)]
pub struct DetectionBuffers {
    detections: Array2<f32>,
    count: u32,
    class_ids: Vec<u32>,
    max_detections: u32,
}

impl DetectionBuffers {
    pub fn new(max_detections: u32) -> Self {
        let capacity = max_detections as usize;
        Self {
            detections: Array2::ones((capacity, PARAMS_PER_DETECTION)),
            count: 0,
            class_ids: vec![0; capacity],
            max_detections,
        }
    }

    pub fn max_detections(&self) -> u32 {
        self.max_detections
    }

    /// `(max_detections, 7)` row-major float buffer.
    pub fn detections_mut(&mut self) -> &mut Array2<f32> {
        &mut self.detections
    }

    pub fn count_mut(&mut self) -> &mut u32 {
        &mut self.count
    }

    pub fn class_ids_mut(&mut self) -> &mut [u32] {
        &mut self.class_ids
    }

    /// The rows the library reported, cut to `(x, y, w, h, confidence)`.
    ///
    /// A count larger than the capacity is clamped.
    pub fn reported(&self) -> ArrayView2<'_, f32> {
        let reported = self.count as usize;
        let rows = reported.min(self.max_detections as usize);
        if reported > rows {
            log::warn!(
                "native library reported {reported} detections for a buffer of {rows}, truncating"
            );
        }
        self.detections.slice(s![..rows, ..DETECTION_FIELDS])
    }
}
