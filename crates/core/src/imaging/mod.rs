pub mod image_file_reader;
pub mod overlay_writer;
