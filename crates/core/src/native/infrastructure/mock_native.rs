//! Recording stand-in for the native library.

use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::native::domain::native_api::{
    DetectionBuffers, ImageFormat, NativeApi, NativeHandle, NativeImage,
};
use crate::shared::constants::PARAMS_PER_DETECTION;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NativeCall {
    Init,
    Create,
    Destroy(usize),
    Rotate { handle: usize, quadrant: u32 },
    Detect {
        handle: usize,
        width: i32,
        height: i32,
        format: ImageFormat,
        max_detections: u32,
        bytes: Vec<u8>,
    },
}

pub(crate) struct MockNative {
    calls: Mutex<Vec<NativeCall>>,
    next_handle: AtomicUsize,
    init_ok: bool,
    create_ok: bool,
    destroy_ok: bool,
    rotate_ok: bool,
    detect_ok: bool,
    rows: Vec<[f32; PARAMS_PER_DETECTION]>,
    reported_count: Option<u32>,
}

impl MockNative {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_handle: AtomicUsize::new(0x1000),
            init_ok: true,
            create_ok: true,
            destroy_ok: true,
            rotate_ok: true,
            detect_ok: true,
            rows: Vec::new(),
            reported_count: None,
        }
    }

    pub(crate) fn failing_init(mut self) -> Self {
        self.init_ok = false;
        self
    }

    pub(crate) fn failing_create(mut self) -> Self {
        self.create_ok = false;
        self
    }

    pub(crate) fn failing_destroy(mut self) -> Self {
        self.destroy_ok = false;
        self
    }

    pub(crate) fn failing_rotate(mut self) -> Self {
        self.rotate_ok = false;
        self
    }

    pub(crate) fn failing_detect(mut self) -> Self {
        self.detect_ok = false;
        self
    }

    /// Rows written to the front of the detection buffer on every call.
    pub(crate) fn with_rows(mut self, rows: Vec<[f32; PARAMS_PER_DETECTION]>) -> Self {
        self.rows = rows;
        self
    }

    /// Count reported back, independent of how many rows were written.
    pub(crate) fn reporting_count(mut self, count: u32) -> Self {
        self.reported_count = Some(count);
        self
    }

    pub(crate) fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn init_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, NativeCall::Init))
    }

    pub(crate) fn destroy_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, NativeCall::Destroy(_)))
    }

    pub(crate) fn rotate_calls(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                NativeCall::Rotate { quadrant, .. } => Some(quadrant),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn detect_calls(&self) -> usize {
        self.count_calls(|c| matches!(c, NativeCall::Detect { .. }))
    }

    fn count_calls(&self, pred: impl Fn(&NativeCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: NativeCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NativeApi for MockNative {
    fn init(&self) -> bool {
        self.record(NativeCall::Init);
        self.init_ok
    }

    fn create_detector(&self) -> Option<NativeHandle> {
        self.record(NativeCall::Create);
        if !self.create_ok {
            return None;
        }
        let token = self.next_handle.fetch_add(0x10, Ordering::Relaxed);
        // Safety: the mock never dereferences the token.
        unsafe { NativeHandle::from_raw(token as *mut c_void) }
    }

    fn destroy_detector(&self, handle: NativeHandle) -> bool {
        self.record(NativeCall::Destroy(handle.as_ptr() as usize));
        self.destroy_ok
    }

    fn rotate(&self, handle: &NativeHandle, quadrant: u32) -> bool {
        self.record(NativeCall::Rotate {
            handle: handle.as_ptr() as usize,
            quadrant,
        });
        self.rotate_ok
    }

    fn detect(
        &self,
        handle: &NativeHandle,
        image: &NativeImage<'_>,
        out: &mut DetectionBuffers,
    ) -> bool {
        self.record(NativeCall::Detect {
            handle: handle.as_ptr() as usize,
            width: image.width,
            height: image.height,
            format: image.format,
            max_detections: out.max_detections(),
            bytes: image.data.to_vec(),
        });
        if !self.detect_ok {
            return false;
        }

        let capacity = out.max_detections() as usize;
        let written = self.rows.len().min(capacity);
        for (i, row) in self.rows.iter().take(written).enumerate() {
            for (j, value) in row.iter().enumerate() {
                out.detections_mut()[[i, j]] = *value;
            }
            out.class_ids_mut()[i] = 1;
        }
        *out.count_mut() = self.reported_count.unwrap_or(written as u32);
        true
    }
}
