pub mod library_locator;
pub mod native_library;

#[cfg(test)]
pub(crate) mod mock_native;
