//! Image-side domain types and the combined engine output.

use serde::{Deserialize, Serialize};

use crate::prices::NormalizedPriceLine;

/// Where an image candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrigin {
    /// Gallery or per-variant image attached to the SKU data.
    Sku,
    /// Image found in the detail-page HTML fragment.
    Detail,
}

/// A candidate image with whatever metadata has been learned about it so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub url: String,
    pub origin: ImageOrigin,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub byte_size: Option<u64>,
}

impl ImageCandidate {
    #[must_use]
    pub fn new(url: impl Into<String>, origin: ImageOrigin) -> Self {
        Self {
            url: url.into(),
            origin,
            width: None,
            height: None,
            byte_size: None,
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_byte_size(mut self, byte_size: Option<u64>) -> Self {
        self.byte_size = byte_size;
        self
    }

    /// `(width, height)` when both are known.
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    /// Pixel area when both dimensions are known.
    #[must_use]
    pub fn area(&self) -> Option<u64> {
        self.dimensions()
            .map(|(w, h)| u64::from(w) * u64::from(h))
    }

    /// `width / height`, or `None` when unknown or when height is zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        match self.dimensions()? {
            (_, 0) => None,
            (w, h) => Some(f64::from(w) / f64::from(h)),
        }
    }
}

/// Engine output handed to the downstream post composer.
///
/// An empty `price_lines` means "use the single fallback price".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub price_lines: Vec<NormalizedPriceLine>,
    pub image_urls: Vec<String>,
}
