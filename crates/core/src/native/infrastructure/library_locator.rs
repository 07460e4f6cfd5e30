use std::env;
use std::path::{Path, PathBuf};

use crate::shared::constants::{
    INSTALL_DIR_ENV, LIBRARY_NAME, LIBRARY_PATH_ENV, SUPPORTED_ARCHITECTURES,
};
use crate::shared::error::{Bd17Error, Result};

/// Finds the native library on disk.
///
/// Resolution order:
/// 1. Explicit library file (`with_library_path` or `BD17_LIBRARY_PATH`)
/// 2. `<install-dir>/../lib/<arch>/<filename>`, where the install dir is
///    the override (`with_install_dir` or `BD17_INSTALL_DIR`) or else the
///    directory of the running executable
///
/// The architecture is checked first in every case.
#[derive(Clone, Debug)]
pub struct LibraryLocator {
    library_path: Option<PathBuf>,
    install_dir: Option<PathBuf>,
    arch: String,
}

impl LibraryLocator {
    pub fn new() -> Self {
        Self {
            library_path: None,
            install_dir: None,
            arch: env::consts::ARCH.to_string(),
        }
    }

    /// Locator seeded from `BD17_LIBRARY_PATH` and `BD17_INSTALL_DIR`.
    pub fn from_env() -> Self {
        Self {
            library_path: env::var_os(LIBRARY_PATH_ENV).map(PathBuf::from),
            install_dir: env::var_os(INSTALL_DIR_ENV).map(PathBuf::from),
            ..Self::new()
        }
    }

    pub fn with_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    pub fn with_install_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(dir.into());
        self
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = arch.into();
        self
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn resolve(&self) -> Result<PathBuf> {
        check_architecture(&self.arch)?;

        if let Some(path) = &self.library_path {
            return Ok(path.clone());
        }

        let install_dir = match &self.install_dir {
            Some(dir) => dir.clone(),
            None => executable_dir()?,
        };
        Ok(library_path_in(&install_dir, &self.arch))
    }
}

impl Default for LibraryLocator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn check_architecture(arch: &str) -> Result<()> {
    if SUPPORTED_ARCHITECTURES.contains(&arch) {
        Ok(())
    } else {
        Err(Bd17Error::UnsupportedArchitecture {
            arch: arch.to_string(),
            supported: SUPPORTED_ARCHITECTURES.join(", "),
        })
    }
}

/// `<install_dir>/../lib/<arch>/<platform filename>`.
pub fn library_path_in(install_dir: &Path, arch: &str) -> PathBuf {
    install_dir
        .join("..")
        .join("lib")
        .join(arch)
        .join(libloading::library_filename(LIBRARY_NAME))
}

fn executable_dir() -> Result<PathBuf> {
    let exe = env::current_exe().map_err(Bd17Error::InstallDirUnresolved)?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Bd17Error::InstallDirUnresolved(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("executable {} has no parent directory", exe.display()),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_library_path_layout() {
        let path = library_path_in(Path::new("/opt/bd17/bin"), "x86_64");
        let expected = Path::new("/opt/bd17/bin")
            .join("..")
            .join("lib")
            .join("x86_64")
            .join(libloading::library_filename("brodmann17"));
        assert_eq!(path, expected);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_library_filename_on_linux() {
        let path = library_path_in(Path::new("pkg"), "x86_64");
        assert_eq!(path.file_name().unwrap(), "libbrodmann17.so");
    }

    #[test]
    fn test_resolve_with_install_dir_override() {
        let locator = LibraryLocator::new()
            .with_arch("x86_64")
            .with_install_dir("/srv/detector/python");
        let path = locator.resolve().unwrap();
        assert_eq!(path, library_path_in(Path::new("/srv/detector/python"), "x86_64"));
    }

    #[test]
    fn test_explicit_library_path_wins() {
        let locator = LibraryLocator::new()
            .with_arch("x86_64")
            .with_install_dir("/ignored")
            .with_library_path("/custom/libbrodmann17.so");
        assert_eq!(
            locator.resolve().unwrap(),
            PathBuf::from("/custom/libbrodmann17.so")
        );
    }

    #[test]
    fn test_resolve_defaults_to_executable_dir() {
        let locator = LibraryLocator::new().with_arch("x86_64");
        let exe_dir = env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(locator.resolve().unwrap(), library_path_in(&exe_dir, "x86_64"));
    }

    #[rstest]
    #[case("aarch64")]
    #[case("arm")]
    #[case("x86")]
    #[case("")]
    fn test_unsupported_architecture_is_rejected(#[case] arch: &str) {
        let locator = LibraryLocator::new()
            .with_arch(arch)
            .with_library_path("/custom/libbrodmann17.so");
        let err = locator.resolve().unwrap_err();
        assert!(matches!(err, Bd17Error::UnsupportedArchitecture { arch: a, .. } if a == arch));
    }

    #[test]
    fn test_unsupported_architecture_message_lists_supported() {
        let err = check_architecture("riscv64").unwrap_err();
        assert!(err.to_string().contains("riscv64"));
        assert!(err.to_string().contains("x86_64"));
    }

    #[test]
    fn test_new_uses_process_architecture() {
        assert_eq!(LibraryLocator::new().arch(), env::consts::ARCH);
    }
}
