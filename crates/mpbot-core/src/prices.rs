//! Price-side domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One deduplicated `(label, price)` pair derived from a raw SKU.
///
/// `price` is always positive; SKUs with unparsable or non-positive prices
/// never become a `RawVariant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVariant {
    pub label: String,
    pub price: Decimal,
}

impl RawVariant {
    #[must_use]
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

/// All distinct labels sharing one exact price, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceGroup {
    pub price: Decimal,
    labels: Vec<String>,
}

impl PriceGroup {
    #[must_use]
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            labels: Vec::new(),
        }
    }

    /// Builds a group from labels, dropping exact duplicates.
    #[must_use]
    pub fn with_labels<I, S>(price: Decimal, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = Self::new(price);
        for label in labels {
            group.insert(label);
        }
        group
    }

    /// Appends `label` unless an identical label is already present.
    ///
    /// Returns `true` when the label was added.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A final presentable price line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPriceLine {
    pub label: String,
    pub price: Decimal,
}

impl NormalizedPriceLine {
    #[must_use]
    pub fn new(label: impl Into<String>, price: Decimal) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}
