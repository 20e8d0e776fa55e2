//! Raw listing shape handed over by the per-platform scrapers.
//!
//! ## Observed shape from marketplace item APIs
//!
//! ### `skus[].props_names`
//! Semicolon-separated `key:value` pairs, e.g. `"颜色分类:白色;尺码:XS"`.
//! Keys are platform attribute names and carry no information for display.
//!
//! ### `skus[].sale_price`
//! Either a JSON number or a string. Strings may use a comma decimal
//! separator (`"158,50"`). Some sources send `price` instead of `sale_price`.
//!
//! ### `sku_props[].values[].imageUrl`
//! Per-variant swatch images. Frequently missing, empty, or protocol-relative
//! (`//img.alicdn.com/...`).
//!
//! ### `item_id`
//! Numeric on some platforms, string on others. Only needed to fetch the
//! detail-page fragment.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw listing as produced by a platform scraper. Lifetime is one scrape call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListing {
    /// Platform item identifier; string or number in the source JSON.
    #[serde(default)]
    pub item_id: Option<Value>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// One record per purchasable SKU. Required.
    pub skus: Vec<RawSku>,

    /// Primary gallery image URLs.
    #[serde(default)]
    pub main_imgs: Vec<String>,

    /// Variant attribute groups, some of which carry per-variant images.
    #[serde(default)]
    pub sku_props: Vec<SkuProp>,
}

impl RawListing {
    /// Returns the item id as a string, accepting either JSON representation.
    ///
    /// Empty strings and non-scalar values are treated as absent.
    #[must_use]
    pub fn item_id(&self) -> Option<String> {
        match self.item_id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// A single SKU record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSku {
    /// Composite attribute string (`key:value;key:value`).
    #[serde(default)]
    pub props_names: String,

    /// Price as a JSON number or string; parsed best-effort downstream.
    #[serde(default, alias = "price")]
    pub sale_price: Value,
}

/// A variant attribute group (e.g. "color") and its values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkuProp {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub values: Vec<SkuPropValue>,
}

/// One value of a [`SkuProp`], optionally with a swatch image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkuPropValue {
    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
}
