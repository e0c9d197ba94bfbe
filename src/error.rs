// Error types shared across the overlay pipeline

use thiserror::Error;

/// Errors raised by the region mapper.
///
/// Both kinds are local and synchronous. The caller decides whether to skip
/// the offending region or abandon the overlay for that image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// Polygon does not have exactly 4 points, or holds a non-finite coordinate
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(GeometryFault),

    /// Natural size is zero, negative or non-finite, or a display size is
    /// negative or non-finite
    #[error("Invalid image metrics: {width}x{height}")]
    InvalidMetrics { width: f64, height: f64 },
}

/// What is wrong with a region's geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryFault {
    #[error("expected 4 points, found {0}")]
    PointCount(usize),

    #[error("non-finite coordinate")]
    NonFinite,
}

/// Errors raised while talking to the OCR and image search endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or response body decode failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("No images found for '{0}'")]
    NoResults(String),
}

/// Errors surfaced by the word screen flow.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Mapping error: {0}")]
    Map(#[from] MapError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("No image has been processed yet")]
    NoImage,

    #[error("No word at ({x}, {y})")]
    NoWordAtPoint { x: f64, y: f64 },

    #[error("Image was replaced before the result arrived")]
    Replaced,

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
