use crate::error::{MapError, SessionError};
use crate::models::config::{AppConfig, OverlayConfig};
use crate::models::geometry::Point;
use crate::models::selected_image::SelectedImage;
use crate::services::config::ConfigManager;
use crate::services::image_search::ImageSearchClient;
use crate::services::ocr::HttpOcrClient;
use crate::services::overlay::WordOverlay;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Where the screen is in its pick -> analyze -> overlay cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenPhase {
    Idle,
    Processing,
    Ready,
    Failed(String),
}

/// Result of tapping a word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordLookup {
    pub word: String,
    pub image_url: String,
}

/// Ephemeral view state of the word screen
#[derive(Debug)]
pub struct ScreenSession {
    pub phase: ScreenPhase,
    pub image: Option<SelectedImage>,
    pub overlay: Option<WordOverlay>,
    pub lookup: Option<WordLookup>,
    /// Last size reported by a layout pass for the current image
    display_size: Option<(f64, f64)>,
    /// Bumped per picked image so a slow response cannot overwrite a newer one
    generation: u64,
}

impl Default for ScreenSession {
    fn default() -> Self {
        Self {
            phase: ScreenPhase::Idle,
            image: None,
            overlay: None,
            lookup: None,
            display_size: None,
            generation: 0,
        }
    }
}

impl ScreenSession {
    pub fn display_size(&self) -> Option<(f64, f64)> {
        self.display_size
    }

    /// Forget the current image and start a new generation
    fn reset(&mut self, phase: ScreenPhase) -> u64 {
        self.generation += 1;
        self.phase = phase;
        self.image = None;
        self.overlay = None;
        self.lookup = None;
        self.display_size = None;
        self.generation
    }
}

/// Shared screen state (Arc for async sharing, parking_lot::Mutex for performance)
pub type ScreenState = Arc<Mutex<ScreenSession>>;

/// Drives the word screen: analyze a picked image, lay out the overlay,
/// resolve taps into image lookups
pub struct WordScreen {
    ocr: HttpOcrClient,
    search: ImageSearchClient,
    overlay_config: OverlayConfig,
    state: ScreenState,
}

impl WordScreen {
    pub fn new(config: &AppConfig) -> Result<Self, SessionError> {
        Ok(Self {
            ocr: HttpOcrClient::new(&config.server)?,
            search: ImageSearchClient::new(&config.server)?,
            overlay_config: config.overlay.clone(),
            state: ScreenState::default(),
        })
    }

    /// Build from the persisted configuration (defaults when none is saved)
    pub fn from_saved_config(manager: &ConfigManager) -> Result<Self, String> {
        let config = manager.load()?;
        Self::new(&config).map_err(|e| format!("Failed to create word screen: {}", e))
    }

    pub fn state(&self) -> ScreenState {
        Arc::clone(&self.state)
    }

    /// Analyze a picked image and build its overlay.
    ///
    /// The overlay is laid out at the last reported display size, or at the
    /// natural size when no layout pass has happened yet. Returns the number
    /// of tappable boxes, or `Replaced` when another image was picked while
    /// this one was being analyzed.
    pub async fn process_image(&self, bytes: Vec<u8>, file_name: &str) -> Result<usize, SessionError> {
        let image = match SelectedImage::from_bytes(bytes, file_name) {
            Ok(image) => image,
            Err(e) => {
                warn!(file_name, error = %e, "could not decode the picked image");
                self.state.lock().reset(ScreenPhase::Failed(e.to_string()));
                return Err(e.into());
            }
        };

        let natural = image.metrics();
        let upload = image.bytes.clone();
        let generation = {
            let mut session = self.state.lock();
            let generation = session.reset(ScreenPhase::Processing);
            session.image = Some(image);
            generation
        };

        info!(file_name, width = natural.natural_width, height = natural.natural_height, "processing image");

        let outcome = match self.ocr.analyze_image(upload, file_name).await {
            Ok(regions) => {
                // Layout may have reported a size while the request was in flight
                let display_size = self.state.lock().display_size;
                let metrics = match display_size {
                    Some((width, height)) => natural.with_display(width, height),
                    None => natural,
                };
                let config = self.overlay_config.clone();
                tokio::task::spawn_blocking(move || WordOverlay::build(&regions, metrics, &config))
                    .await
                    .map_err(SessionError::from)
                    .and_then(|built| built.map_err(SessionError::from))
            }
            Err(e) => Err(e.into()),
        };

        let mut session = self.state.lock();
        if session.generation != generation {
            warn!(file_name, "discarding result for a replaced image");
            return Err(SessionError::Replaced);
        }

        let display_size = session.display_size;
        let outcome = outcome.and_then(|overlay| match display_size {
            Some((width, height))
                if overlay.metrics().display_width != width || overlay.metrics().display_height != height =>
            {
                overlay.relayout(width, height).map_err(SessionError::from)
            }
            _ => Ok(overlay),
        });

        match outcome {
            Ok(overlay) => {
                let count = overlay.boxes().len();
                info!(boxes = count, skipped = overlay.skipped(), "overlay ready");
                session.overlay = Some(overlay);
                session.phase = ScreenPhase::Ready;
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "could not process the image");
                session.phase = ScreenPhase::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Layout pass reported a new on-screen size for the image.
    ///
    /// The size is kept even before an overlay exists, so a result still in
    /// flight is laid out at it.
    pub fn on_layout(&self, display_width: f64, display_height: f64) -> Result<(), SessionError> {
        let valid = [display_width, display_height]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0);
        if !valid {
            return Err(MapError::InvalidMetrics {
                width: display_width,
                height: display_height,
            }
            .into());
        }

        let mut session = self.state.lock();
        session.display_size = Some((display_width, display_height));
        if let Some(overlay) = session.overlay.as_ref() {
            let resized = overlay.relayout(display_width, display_height)?;
            session.overlay = Some(resized);
        }
        Ok(())
    }

    /// Resolve a tap on the overlay into an image for the word under it
    pub async fn on_tap(&self, x: f64, y: f64) -> Result<WordLookup, SessionError> {
        let (word, generation) = {
            let session = self.state.lock();
            let overlay = session.overlay.as_ref().ok_or(SessionError::NoImage)?;
            let word = overlay
                .hit_test(Point::new(x, y))
                .map(|b| b.text.clone())
                .ok_or(SessionError::NoWordAtPoint { x, y })?;
            (word, session.generation)
        };

        let image_url = self.search.first_image(&word).await?;
        let lookup = WordLookup { word, image_url };

        let mut session = self.state.lock();
        if session.generation != generation {
            warn!(word = %lookup.word, "discarding lookup for a replaced image");
            return Err(SessionError::Replaced);
        }
        session.lookup = Some(lookup.clone());
        Ok(lookup)
    }

    /// Close the lookup popup
    pub fn dismiss_lookup(&self) {
        self.state.lock().lookup = None;
    }
}
