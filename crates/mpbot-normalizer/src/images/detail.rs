//! `<img>` discovery in item detail-page fragments.
//!
//! Detail fragments are seller-authored HTML. Some tags carry an explicit
//! `size="750x1000"` attribute; those candidates need no probing.

use std::sync::LazyLock;

use mpbot_core::{ImageCandidate, ImageOrigin};
use regex::Regex;

use super::normalize_image_url;

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\s([a-z][a-z0-9_:-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid attr regex")
});
static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*[x×*]\s*(\d+)").expect("valid size regex"));

/// Source attributes in order of preference.
const SRC_ATTRS: [&str; 3] = ["src", "data-src", "data-original"];

/// Extracts unique image candidates from a detail fragment, in document order.
///
/// The URL comes from `src`, or from a lazy-load attribute when `src` is
/// missing or not an http(s) URL (placeholder data URIs). Tags with a
/// parseable `size` attribute get their dimensions set.
#[must_use]
pub fn parse_detail_images(html: &str) -> Vec<ImageCandidate> {
    let mut candidates: Vec<ImageCandidate> = Vec::new();

    for m in IMG_TAG_RE.find_iter(html) {
        let tag = m.as_str();
        let Some(url) = SRC_ATTRS
            .iter()
            .find_map(|attr| extract_attr(tag, attr).and_then(|raw| normalize_image_url(&raw)))
        else {
            continue;
        };
        if candidates.iter().any(|c| c.url == url) {
            continue;
        }

        let mut candidate = ImageCandidate::new(url, ImageOrigin::Detail);
        if let Some((width, height)) = extract_attr(tag, "size").as_deref().and_then(parse_size_attr)
        {
            candidate = candidate.with_dimensions(width, height);
        }
        candidates.push(candidate);
    }

    tracing::debug!(
        found = candidates.len(),
        sized = candidates.iter().filter(|c| c.dimensions().is_some()).count(),
        "detail images parsed"
    );
    candidates
}

fn parse_size_attr(value: &str) -> Option<(u32, u32)> {
    let caps = SIZE_RE.captures(value)?;
    let width = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let height = caps.get(2)?.as_str().parse::<u32>().ok()?;
    Some((width, height))
}

fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let name = caps.get(1)?;
        if !name.as_str().eq_ignore_ascii_case(attr) {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
        Some(value.as_str().trim().to_string())
    })
}
