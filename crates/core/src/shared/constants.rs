/// Base name of the native detector library; the platform prefix and
/// extension are added by `libloading::library_filename`.
pub const LIBRARY_NAME: &str = "brodmann17";

/// Machine architectures the native library is shipped for.
pub const SUPPORTED_ARCHITECTURES: &[&str] = &["x86_64"];

/// Default capacity of the detection output buffer.
pub const DEFAULT_MAX_DETECTIONS: usize = 10_000;

/// Floats per detection row written by the native library:
/// `[x, y, w, h, confidence, pad, pad]`.
pub const PARAMS_PER_DETECTION: usize = 7;

/// Leading columns of a detection row that carry meaning.
pub const DETECTION_FIELDS: usize = 5;

/// Overrides the install directory used to locate `../lib/<arch>/`.
pub const INSTALL_DIR_ENV: &str = "BD17_INSTALL_DIR";

/// Full path to the native library; skips path resolution entirely.
pub const LIBRARY_PATH_ENV: &str = "BD17_LIBRARY_PATH";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
