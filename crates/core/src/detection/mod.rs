pub mod detector;
pub mod face_detection;
pub mod image_buffer;
pub mod rotation;
