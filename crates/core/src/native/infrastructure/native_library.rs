use std::ffi::{c_char, c_float, c_int, c_uint, c_void};
use std::path::{Path, PathBuf};
use std::ptr;
use std::sync::Arc;

use libloading::Library;
use once_cell::sync::OnceCell;

use super::library_locator::LibraryLocator;
use crate::native::domain::native_api::{
    DetectionBuffers, NativeApi, NativeHandle, NativeImage,
};
use crate::shared::error::{Bd17Error, Result};

type InitFn = unsafe extern "C" fn() -> bool;
type CreateDetectorFn = unsafe extern "C" fn() -> *mut c_void;
type DestroyDetectorFn = unsafe extern "C" fn(*mut c_void) -> bool;
type RotateFn = unsafe extern "C" fn(*mut c_void, c_int) -> bool;
type DetectFn = unsafe extern "C" fn(
    *mut c_void,
    *mut c_float,
    *mut c_uint,
    c_uint,
    *mut c_void,
    c_int,
    c_int,
    c_int,
    *mut c_uint,
    *mut c_char,
) -> bool;

static GLOBAL: OnceCell<Arc<NativeLibrary>> = OnceCell::new();

/// The loaded vendor library with its five entry points resolved.
///
/// The function pointers stay valid for as long as `_library` is alive,
/// which is the lifetime of this struct.
pub struct NativeLibrary {
    init: InitFn,
    create_detector: CreateDetectorFn,
    destroy_detector: DestroyDetectorFn,
    rotate: RotateFn,
    detect: DetectFn,
    path: PathBuf,
    _library: Library,
}

impl NativeLibrary {
    /// Opens the library and resolves its symbols without calling `Init`.
    ///
    /// # Safety
    ///
    /// `path` must name the brodmann17 library (or a library exporting the
    /// same C ABI). Loading runs its initializers, and the resolved symbols
    /// are called with the signatures from `libbrodmann17.h`.
    pub unsafe fn open(path: &Path) -> Result<Self> {
        let load_error = |source| Bd17Error::LibraryLoadError {
            path: path.to_path_buf(),
            source,
        };

        let library = Library::new(path).map_err(load_error)?;
        let init = *library.get::<InitFn>(b"Init\0").map_err(load_error)?;
        let create_detector = *library
            .get::<CreateDetectorFn>(b"CreateDetector\0")
            .map_err(load_error)?;
        let destroy_detector = *library
            .get::<DestroyDetectorFn>(b"DestroyDetector\0")
            .map_err(load_error)?;
        let rotate = *library.get::<RotateFn>(b"Rotate\0").map_err(load_error)?;
        let detect = *library.get::<DetectFn>(b"Detect\0").map_err(load_error)?;

        Ok(Self {
            init,
            create_detector,
            destroy_detector,
            rotate,
            detect,
            path: path.to_path_buf(),
            _library: library,
        })
    }

    /// Opens the library and runs its one-time `Init`.
    ///
    /// # Safety
    ///
    /// Same contract as [`NativeLibrary::open`].
    pub unsafe fn load(path: &Path) -> Result<Self> {
        let library = Self::open(path)?;
        initialize(&library)?;
        log::info!("Loaded native detector library from {}", path.display());
        Ok(library)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Calls `Init` and maps a falsy status to [`Bd17Error::InitializationError`].
pub fn initialize(api: &dyn NativeApi) -> Result<()> {
    if api.init() {
        Ok(())
    } else {
        Err(Bd17Error::InitializationError)
    }
}

/// Process-wide library, located through the environment on first use.
pub fn global() -> Result<Arc<NativeLibrary>> {
    global_with(&LibraryLocator::from_env())
}

/// Process-wide library, located with `locator` on first use.
///
/// Once a load has succeeded the library is never reloaded and `locator`
/// is ignored. A failed load is not cached.
pub fn global_with(locator: &LibraryLocator) -> Result<Arc<NativeLibrary>> {
    GLOBAL
        .get_or_try_init(|| {
            let path = locator.resolve()?;
            log::debug!("Resolved native library path: {}", path.display());
            // Safety: the locator only yields the vendor library location or
            // a path the user explicitly configured for it.
            unsafe { NativeLibrary::load(&path) }.map(Arc::new)
        })
        .cloned()
}

impl NativeApi for NativeLibrary {
    fn init(&self) -> bool {
        // Safety: `Init` takes no arguments.
        unsafe { (self.init)() }
    }

    fn create_detector(&self) -> Option<NativeHandle> {
        // Safety: the pointer comes straight from `CreateDetector` and is
        // owned by nothing else yet.
        unsafe { NativeHandle::from_raw((self.create_detector)()) }
    }

    fn destroy_detector(&self, handle: NativeHandle) -> bool {
        // Safety: the handle was produced by this library and is consumed here.
        unsafe { (self.destroy_detector)(handle.as_ptr()) }
    }

    fn rotate(&self, handle: &NativeHandle, quadrant: u32) -> bool {
        // Safety: `bd17_rotation_t` is an int-sized enum with values 0..=3.
        unsafe { (self.rotate)(handle.as_ptr(), (quadrant % 4) as c_int) }
    }

    fn detect(
        &self,
        handle: &NativeHandle,
        image: &NativeImage<'_>,
        out: &mut DetectionBuffers,
    ) -> bool {
        let max_detections = out.max_detections();
        let detections = out.detections_mut().as_mut_ptr();
        let count: *mut c_uint = out.count_mut();
        let class_ids = out.class_ids_mut().as_mut_ptr();

        // Safety: every output buffer holds `max_detections` entries (7 floats
        // per detection row) and outlives the call. The image slice covers
        // width * height * channels bytes, which the library only reads.
        unsafe {
            (self.detect)(
                handle.as_ptr(),
                detections,
                count,
                max_detections,
                image.data.as_ptr() as *mut c_void,
                image.width,
                image.height,
                image.format.code(),
                class_ids,
                ptr::null_mut(),
            )
        }
    }
}
