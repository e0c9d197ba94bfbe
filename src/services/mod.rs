pub mod config;
pub mod image_search;
pub mod ocr;
pub mod overlay;
pub mod region_mapper;
