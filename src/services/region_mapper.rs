use crate::error::{GeometryFault, MapError};
use crate::models::geometry::{DisplayRect, ImageMetrics, NaturalBox, Point};
use crate::models::ocr_result::RawRegion;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of corners an OCR provider reports per token
pub const POLYGON_POINTS: usize = 4;

/// A recognized token positioned in display space
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappedRegion {
    pub text: String,
    /// Box in natural space, retained so the rect can be recomputed on relayout
    pub natural: NaturalBox,
    pub rect: DisplayRect,
}

/// Collapse a 4-point polygon into its axis-aligned bounding box.
///
/// Corner order is provider-defined, so extents come from min/max over all
/// four points rather than from named corners. Collinear input yields a
/// zero-sized box, not an error.
pub fn normalize_bounding_box(polygon: &[Point]) -> Result<NaturalBox, MapError> {
    if polygon.len() != POLYGON_POINTS {
        return Err(MapError::InvalidGeometry(GeometryFault::PointCount(polygon.len())));
    }
    if !polygon.iter().all(Point::is_finite) {
        return Err(MapError::InvalidGeometry(GeometryFault::NonFinite));
    }

    let left = polygon.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let right = polygon.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let top = polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let bottom = polygon.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    Ok(NaturalBox {
        left,
        top,
        width: (right - left).max(0.0),
        height: (bottom - top).max(0.0),
    })
}

/// Scale a natural-space box into display space, clamped to the display bounds.
pub fn to_display_space(natural: &NaturalBox, metrics: &ImageMetrics) -> Result<DisplayRect, MapError> {
    check_natural(metrics)?;
    check_display(metrics)?;

    let finite = [natural.left, natural.top, natural.width, natural.height]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return Err(MapError::InvalidGeometry(GeometryFault::NonFinite));
    }

    let (scale_x, scale_y) = metrics.scale();
    let (left, width) = clamp_span(
        natural.left * scale_x,
        natural.width.max(0.0) * scale_x,
        metrics.display_width,
    );
    let (top, height) = clamp_span(
        natural.top * scale_y,
        natural.height.max(0.0) * scale_y,
        metrics.display_height,
    );

    Ok(DisplayRect {
        left,
        top,
        width,
        height,
    })
}

/// Map a display-space point back to natural image coordinates.
///
/// The display size must be non-zero here, since it becomes the divisor.
pub fn to_natural_space(point: Point, metrics: &ImageMetrics) -> Result<Point, MapError> {
    check_natural(metrics)?;
    if !(metrics.has_valid_display() && metrics.display_width > 0.0 && metrics.display_height > 0.0) {
        return Err(MapError::InvalidMetrics {
            width: metrics.display_width,
            height: metrics.display_height,
        });
    }

    Ok(Point {
        x: point.x * metrics.natural_width / metrics.display_width,
        y: point.y * metrics.natural_height / metrics.display_height,
    })
}

/// Normalize and scale a single OCR region
pub fn map_region(region: &RawRegion, metrics: &ImageMetrics) -> Result<MappedRegion, MapError> {
    let natural = normalize_bounding_box(&region.polygon)?;
    let rect = to_display_space(&natural, metrics)?;

    Ok(MappedRegion {
        text: region.text.clone(),
        natural,
        rect,
    })
}

/// Map every region independently; results keep input order.
///
/// A malformed region only fails its own slot.
pub fn map_regions(regions: &[RawRegion], metrics: &ImageMetrics) -> Vec<Result<MappedRegion, MapError>> {
    regions
        .par_iter()
        .map(|region| map_region(region, metrics))
        .collect()
}

fn check_natural(metrics: &ImageMetrics) -> Result<(), MapError> {
    if metrics.has_valid_natural() {
        Ok(())
    } else {
        Err(MapError::InvalidMetrics {
            width: metrics.natural_width,
            height: metrics.natural_height,
        })
    }
}

fn check_display(metrics: &ImageMetrics) -> Result<(), MapError> {
    if metrics.has_valid_display() {
        Ok(())
    } else {
        Err(MapError::InvalidMetrics {
            width: metrics.display_width,
            height: metrics.display_height,
        })
    }
}

/// Clamp `[start, start + length]` into `[0, max]`, returning (start, length)
/// with `start + length <= max`.
fn clamp_span(start: f64, length: f64, max: f64) -> (f64, f64) {
    let lo = start.clamp(0.0, max);
    let hi = (start + length).clamp(0.0, max);
    let mut length = (hi - lo).max(0.0);
    if lo + length > max {
        length = (max - lo).max(0.0);
    }
    (lo, length)
}
