//! Statistical quality filtering of image candidates.
//!
//! Five order-preserving stages, each applied to the survivors of the
//! previous one:
//!
//! 1. reject images under the minimum side length
//! 2. reject images under the minimum byte size (only when the size is known)
//! 3. reject banners: aspect ratio outside `[min_aspect, max_aspect]`
//! 4. reject area outliers relative to the median area
//! 5. reject images whose aspect ratio strays from the median aspect ratio
//!
//! Candidates with unknown dimensions pass every dimension-based stage and
//! are left out of the medians. The pass repeats until it removes nothing,
//! so filtering the output again is a no-op.

use mpbot_core::{ImageCandidate, ImageFilterThresholds};

/// Filters `candidates`, keeping order. Duplicate URLs keep their first
/// occurrence. Returns an empty list if every candidate is rejected.
#[must_use]
pub fn filter_images(
    candidates: Vec<ImageCandidate>,
    thresholds: &ImageFilterThresholds,
) -> Vec<ImageCandidate> {
    let mut current: Vec<ImageCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !current.iter().any(|c| c.url == candidate.url) {
            current.push(candidate);
        }
    }

    let mut passes = 0u32;
    loop {
        let before = current.len();
        current = filter_pass(current, thresholds);
        passes += 1;
        if current.len() == before || current.is_empty() {
            break;
        }
    }

    tracing::debug!(kept = current.len(), passes, "image quality filter settled");
    current
}

#[allow(clippy::cast_precision_loss)] // pixel areas are far below 2^52
fn filter_pass(
    candidates: Vec<ImageCandidate>,
    t: &ImageFilterThresholds,
) -> Vec<ImageCandidate> {
    let kept = retain_stage("min_side", candidates, |c| {
        c.dimensions()
            .is_none_or(|(w, h)| w.min(h) >= t.min_side_px)
    });

    let kept = retain_stage("min_bytes", kept, |c| {
        c.byte_size.is_none_or(|bytes| bytes >= t.min_bytes)
    });

    let kept = retain_stage("banner", kept, |c| {
        c.aspect_ratio()
            .is_none_or(|ratio| (t.min_aspect..=t.max_aspect).contains(&ratio))
    });

    let median_area = median(kept.iter().filter_map(|c| c.area().map(|a| a as f64)).collect());
    let kept = match median_area {
        Some(median) if median > 0.0 => retain_stage("area_outlier", kept, |c| {
            c.area().is_none_or(|area| {
                let ratio = area as f64 / median;
                (t.min_area_ratio..=t.max_area_ratio).contains(&ratio)
            })
        }),
        _ => kept,
    };

    let median_aspect = median(kept.iter().filter_map(ImageCandidate::aspect_ratio).collect());
    match median_aspect {
        Some(median) => retain_stage("aspect_homogeneity", kept, |c| {
            c.aspect_ratio()
                .is_none_or(|ratio| (ratio - median).abs() <= t.aspect_tolerance * median)
        }),
        None => kept,
    }
}

fn retain_stage<F>(stage: &'static str, candidates: Vec<ImageCandidate>, keep: F) -> Vec<ImageCandidate>
where
    F: Fn(&ImageCandidate) -> bool,
{
    let before = candidates.len();
    let kept: Vec<ImageCandidate> = candidates.into_iter().filter(|c| keep(c)).collect();
    if kept.len() != before {
        tracing::debug!(stage, before, after = kept.len(), "image filter stage rejected candidates");
    }
    kept
}

/// Median of `values`; the mean of the middle two for even counts.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
