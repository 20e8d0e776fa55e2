//! Image pipeline: source selection, detail-image discovery and probing,
//! and statistical quality filtering.

pub mod detail;
pub mod filter;
pub mod probe;
pub mod select;

pub use detail::parse_detail_images;
pub use filter::filter_images;
pub use probe::ImageProber;
pub use select::{select_image_source, ImagePool, SourceSelection};

/// Normalizes a raw image URL for comparison and fetching.
///
/// Trims whitespace, decodes `&amp;`, and upgrades protocol-relative
/// `//host/path` URLs to `https:`. Returns `None` for empty values and
/// anything that is not an absolute http(s) URL (data URIs, relative paths).
#[must_use]
pub fn normalize_image_url(raw: &str) -> Option<String> {
    let url = raw.trim().replace("&amp;", "&");
    if url.starts_with("//") {
        return Some(format!("https:{url}"));
    }
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

/// Normalizes and de-duplicates `urls`, keeping first occurrences.
pub fn unique_urls<'a, I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = Vec::new();
    for url in urls.into_iter().filter_map(normalize_image_url) {
        if !seen.contains(&url) {
            seen.push(url);
        }
    }
    seen
}
