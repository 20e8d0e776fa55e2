use mpbot_core::RawListing;
use serde::Serialize;

use super::unique_urls;

/// Which image pool a listing's images were taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePool {
    /// Images attached to SKU property values (`sku_props[].values[].imageUrl`).
    Variant,
    /// The primary gallery (`main_imgs`).
    Gallery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSelection {
    pub pool: ImagePool,
    pub urls: Vec<String>,
}

/// Picks the richer of the variant and gallery image pools.
///
/// The variant pool wins only with strictly more unique images; ties go to
/// the gallery, so equal-count noisy data always resolves the same way.
#[must_use]
pub fn select_image_source(listing: &RawListing) -> SourceSelection {
    let variant = unique_urls(
        listing
            .sku_props
            .iter()
            .flat_map(|prop| &prop.values)
            .filter_map(|value| value.image_url.as_deref()),
    );
    let gallery = unique_urls(listing.main_imgs.iter().map(String::as_str));

    tracing::debug!(
        variant = variant.len(),
        gallery = gallery.len(),
        "image pools counted"
    );

    if variant.len() > gallery.len() {
        SourceSelection {
            pool: ImagePool::Variant,
            urls: variant,
        }
    } else {
        SourceSelection {
            pool: ImagePool::Gallery,
            urls: gallery,
        }
    }
}
