use crate::error::ClientError;
use crate::models::geometry::ImageMetrics;
use image::ImageReader;
use std::io::Cursor;

/// Image picked by the user, with its natural pixel size
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SelectedImage {
    /// Read the natural size from the encoded header without decoding pixels
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, ClientError> {
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .into_dimensions()?;

        Ok(Self {
            file_name: file_name.into(),
            bytes,
            width,
            height,
        })
    }

    /// Metrics before any layout pass: drawn at natural size
    pub fn metrics(&self) -> ImageMetrics {
        ImageMetrics::unscaled(self.width as f64, self.height as f64)
    }
}
