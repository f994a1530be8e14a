pub mod image_helper;
pub mod number_format;
