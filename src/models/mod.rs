pub mod config;
pub mod geometry;
pub mod ocr_result;
pub mod selected_image;
