use crate::models::geometry::Point;
use serde::{Deserialize, Serialize};

/// One recognized token as reported by an OCR provider.
///
/// `polygon` is in natural pixel space and its corner order is whatever the
/// provider chose; nothing here validates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRegion {
    pub text: String,
    pub polygon: Vec<Point>,
}

impl RawRegion {
    pub fn new(text: impl Into<String>, polygon: Vec<Point>) -> Self {
        Self {
            text: text.into(),
            polygon,
        }
    }
}

/// Word entry in the hosted service's `analyze-image` response
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedWord {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_polygon: Vec<Point>,
}

/// Line of words
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AnalyzedLine {
    #[serde(default)]
    pub words: Vec<AnalyzedWord>,
}

/// Hosted OCR response: blocks of lines of words
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub text_blocks: Vec<Vec<AnalyzedLine>>,
}

impl AnalyzeResponse {
    /// Flatten blocks -> lines -> words into regions, in reading order
    pub fn into_regions(self) -> Vec<RawRegion> {
        self.text_blocks
            .into_iter()
            .flatten()
            .flat_map(|line| line.words)
            .map(|word| RawRegion::new(word.text, word.bounding_polygon))
            .collect()
    }
}

/// Image search hit
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageLink {
    pub link: String,
}

/// Image search response
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ImageSearchResponse {
    #[serde(default)]
    pub images: Vec<ImageLink>,
}
