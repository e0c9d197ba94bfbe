pub mod http_ocr;

// Re-export main types
pub use http_ocr::HttpOcrClient;
