//! Maps OCR text regions from source-image pixels onto the image as it is
//! displayed, so each recognized word can be drawn as a tappable box.
//!
//! The pure geometry lives in [`services::region_mapper`]; the rest wires it
//! to the hosted OCR endpoint, the image search lookup and the screen state.

pub mod commands;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use commands::screen::{ScreenPhase, ScreenSession, ScreenState, WordLookup, WordScreen};
pub use error::{ClientError, GeometryFault, MapError, SessionError};
pub use models::config::AppConfig;
pub use models::geometry::{DisplayRect, ImageMetrics, NaturalBox, Point};
pub use models::ocr_result::RawRegion;
pub use services::overlay::{OverlayBox, WordOverlay};
pub use services::region_mapper::{
    map_region, map_regions, normalize_bounding_box, to_display_space, to_natural_space,
    MappedRegion,
};
pub use utils::logging::init_tracing;
