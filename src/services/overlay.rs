use crate::error::MapError;
use crate::models::config::OverlayConfig;
use crate::models::geometry::{DisplayRect, ImageMetrics, NaturalBox, Point};
use crate::models::ocr_result::RawRegion;
use crate::services::region_mapper::{self, MappedRegion};
use serde::Serialize;
use tracing::{debug, warn};

/// One tappable word box
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OverlayBox {
    /// Position of the source region in the OCR output
    pub index: usize,
    pub text: String,
    pub natural: NaturalBox,
    pub rect: DisplayRect,
}

/// Tappable word boxes laid over a displayed image
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WordOverlay {
    metrics: ImageMetrics,
    boxes: Vec<OverlayBox>,
    skipped: usize,
}

impl WordOverlay {
    /// Map every region onto the display.
    ///
    /// With `skip_invalid_regions` a malformed region is logged and left out;
    /// otherwise the first failure aborts the overlay. Bad metrics always abort.
    pub fn build(
        regions: &[RawRegion],
        metrics: ImageMetrics,
        config: &OverlayConfig,
    ) -> Result<Self, MapError> {
        let mut boxes = Vec::with_capacity(regions.len());
        let mut skipped = 0;

        let results = region_mapper::map_regions(regions, &metrics);
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(MappedRegion { text, natural, rect }) => {
                    if config.ignore_blank_text && text.trim().is_empty() {
                        skipped += 1;
                        continue;
                    }
                    boxes.push(OverlayBox {
                        index,
                        text,
                        natural,
                        rect,
                    });
                }
                Err(err @ MapError::InvalidGeometry(_)) if config.skip_invalid_regions => {
                    warn!(index, error = %err, "skipping malformed region");
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        debug!(
            boxes = boxes.len(),
            skipped,
            display_width = metrics.display_width,
            display_height = metrics.display_height,
            "overlay built"
        );

        Ok(Self {
            metrics,
            boxes,
            skipped,
        })
    }

    /// Overlay for a new display size; rects are recomputed from natural boxes
    pub fn relayout(&self, display_width: f64, display_height: f64) -> Result<Self, MapError> {
        let metrics = self.metrics.with_display(display_width, display_height);

        let boxes = self
            .boxes
            .iter()
            .map(|b| {
                Ok(OverlayBox {
                    rect: region_mapper::to_display_space(&b.natural, &metrics)?,
                    ..b.clone()
                })
            })
            .collect::<Result<Vec<_>, MapError>>()?;

        debug!(display_width, display_height, "overlay relayout");

        Ok(Self {
            metrics,
            boxes,
            skipped: self.skipped,
        })
    }

    /// Topmost box under a display-space point (later boxes draw on top)
    pub fn hit_test(&self, point: Point) -> Option<&OverlayBox> {
        self.boxes.iter().rev().find(|b| b.rect.contains(point))
    }

    /// Map a display-space tap back onto the source image
    pub fn to_natural(&self, point: Point) -> Result<Point, MapError> {
        region_mapper::to_natural_space(point, &self.metrics)
    }

    pub fn metrics(&self) -> &ImageMetrics {
        &self.metrics
    }

    pub fn boxes(&self) -> &[OverlayBox] {
        &self.boxes
    }

    /// Regions left out (malformed geometry or blank text)
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
