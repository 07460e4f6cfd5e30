pub mod native_api;
