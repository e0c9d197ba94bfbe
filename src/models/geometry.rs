use serde::{Deserialize, Serialize};

/// A point in pixel space (natural or display, depending on context)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box in natural (source image) pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NaturalBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl NaturalBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Rectangle in display space, ready for absolute positioning
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Get the end coordinates
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when the rectangle covers no pixels (degenerate region)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if the rectangle contains a display-space point (right/bottom exclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }
}

/// Per-image size facts: the size OCR saw and the size it is drawn at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ImageMetrics {
    pub natural_width: f64,
    pub natural_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl ImageMetrics {
    pub fn new(natural_width: f64, natural_height: f64, display_width: f64, display_height: f64) -> Self {
        Self {
            natural_width,
            natural_height,
            display_width,
            display_height,
        }
    }

    /// Metrics for an image drawn at its natural size
    pub fn unscaled(natural_width: f64, natural_height: f64) -> Self {
        Self::new(natural_width, natural_height, natural_width, natural_height)
    }

    /// Derive metrics for a new layout pass; natural size is kept
    pub fn with_display(&self, display_width: f64, display_height: f64) -> Self {
        Self {
            display_width,
            display_height,
            ..*self
        }
    }

    /// Natural size is usable as a divisor
    pub fn has_valid_natural(&self) -> bool {
        is_positive(self.natural_width) && is_positive(self.natural_height)
    }

    /// Display size is finite and non-negative (zero before the first layout pass)
    pub fn has_valid_display(&self) -> bool {
        is_non_negative(self.display_width) && is_non_negative(self.display_height)
    }

    /// Natural-to-display scale factors `(scale_x, scale_y)`.
    ///
    /// Callers must check `has_valid_natural` first.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.display_width / self.natural_width,
            self.display_height / self.natural_height,
        )
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
