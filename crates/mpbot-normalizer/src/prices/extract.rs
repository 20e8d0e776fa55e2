//! Conversion from raw SKU records to deduplicated [`RawVariant`]s and
//! exact-price [`PriceGroup`]s.
//!
//! Price parsing is best-effort: a SKU whose price cannot be read, or is not
//! positive, is dropped without raising.

use std::collections::HashSet;
use std::str::FromStr;

use mpbot_core::{PriceGroup, RawSku, RawVariant};
use rust_decimal::Decimal;
use serde_json::Value;

/// Parses a price from a JSON number or string.
///
/// Strings may carry surrounding whitespace, a currency sign, a comma decimal
/// separator (`"158,50"`) or comma thousands separators (`"1,299.00"`).
/// Returns `None` for anything unparsable or not strictly positive.
#[must_use]
pub fn parse_price(raw: &Value) -> Option<Decimal> {
    let price = match raw {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .ok()?,
        Value::String(s) => parse_price_str(s)?,
        _ => return None,
    };
    (price > Decimal::ZERO).then(|| price.normalize())
}

fn parse_price_str(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.contains('.'), cleaned.matches(',').count()) {
        // "1,299.00": commas are thousands separators.
        (true, _) => cleaned.replace(',', ""),
        // "158,50" or "158,5": a single comma with one or two trailing digits is a decimal point.
        (false, 1) => {
            let (int_part, frac_part) = cleaned.split_once(',')?;
            if (1..=2).contains(&frac_part.len()) {
                format!("{int_part}.{frac_part}")
            } else {
                format!("{int_part}{frac_part}")
            }
        }
        (false, _) => cleaned.replace(',', ""),
    };

    Decimal::from_str(&normalized).ok()
}

/// Derives the display name of a SKU from its composite attribute string.
///
/// `"颜色分类:白色;尺码:XS"` becomes `"白色 XS"`: keys are discarded, values
/// are joined with a single space. The value is whatever follows the last
/// `:`, so id-prefixed pairs (`"0:1:尺码:XS"`) work too. Pairs without a `:`
/// are kept verbatim.
#[must_use]
pub fn variant_name(props_names: &str) -> String {
    props_names
        .split(';')
        .map(|pair| match pair.rsplit_once(':') {
            Some((_, value)) => value,
            None => pair,
        })
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts deduplicated variants from raw SKU records.
///
/// Dedup key is `(lower-cased name, price)`; the first occurrence wins and
/// order of first occurrence is preserved. SKUs with an empty derived name or
/// an unparsable price are skipped.
#[must_use]
pub fn extract_variants(skus: &[RawSku]) -> Vec<RawVariant> {
    let mut seen: HashSet<(String, Decimal)> = HashSet::new();
    let mut variants = Vec::new();

    for sku in skus {
        let name = variant_name(&sku.props_names);
        if name.is_empty() {
            continue;
        }
        let Some(price) = parse_price(&sku.sale_price) else {
            tracing::debug!(props = %sku.props_names, raw_price = %sku.sale_price, "dropping SKU with unparsable price");
            continue;
        };
        if seen.insert((name.to_lowercase(), price)) {
            variants.push(RawVariant::new(name, price));
        }
    }

    variants
}

/// Groups variants by exact price, preserving first-occurrence order of
/// prices and of labels within each price.
#[must_use]
pub fn group_by_price(variants: &[RawVariant]) -> Vec<PriceGroup> {
    let mut groups: Vec<PriceGroup> = Vec::new();
    for variant in variants {
        match groups.iter_mut().find(|g| g.price == variant.price) {
            Some(group) => {
                group.insert(variant.label.clone());
            }
            None => groups.push(PriceGroup::with_labels(
                variant.price,
                [variant.label.clone()],
            )),
        }
    }
    groups
}

/// Number of distinct prices among `variants`.
#[must_use]
pub fn distinct_price_count(variants: &[RawVariant]) -> usize {
    variants
        .iter()
        .map(|v| v.price)
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
