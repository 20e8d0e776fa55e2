//! LLM-assisted price summarization.
//!
//! Two structured calls: the first translates every variant label (with the
//! listing title and description as context), the second clusters the
//! translated variants into product-type lines. The model output is then
//! checked against the input: lines with prices that never existed are
//! dropped, color-only labels are dropped, and any input price the model
//! left out is filled in by the rule-based strategy.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mpbot_core::{NormalizedPriceLine, RawVariant};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use super::rules::RuleSummarizer;
use super::{PriceSummarizer, SummaryRequest};
use crate::collaborators::JsonGenerator;
use crate::error::LlmError;
use crate::prices::extract::{group_by_price, parse_price};
use crate::prices::merge::merge_labels;
use crate::prices::variant_type::classify;
use crate::retry::retry_with_budget;

/// Description context is cut to this many characters.
const MAX_DESCRIPTION_CHARS: usize = 1500;

const TRANSLATE_SYSTEM_PROMPT: &str = "You translate marketplace product variant labels. \
Answer with JSON only: an array of objects {\"label\": string, \"price\": string}. \
Return exactly one object per input item, in the same order, keeping every price unchanged. \
Translate labels into the requested language, drop seller codes and keep sizes.";

const SUMMARIZE_SYSTEM_PROMPT: &str = "You group marketplace product variants into short price lines. \
Answer with JSON only: an array of objects {\"label\": string, \"price\": string}. \
Group variants by product type and price. Never group or name lines by color, print or pattern, \
and never output a label that is only a color. Do not list sizes. \
Every input price must appear in the output, and no other prices may appear.";

/// Translate-then-cluster strategy backed by a [`JsonGenerator`].
///
/// Falls back to the wrapped [`RuleSummarizer`] wholesale when the model
/// keeps failing, and for the remainder when it drops prices.
pub struct LlmSummarizer {
    generator: Arc<dyn JsonGenerator>,
    fallback: RuleSummarizer,
}

impl LlmSummarizer {
    #[must_use]
    pub fn new(generator: Arc<dyn JsonGenerator>, fallback: RuleSummarizer) -> Self {
        Self {
            generator,
            fallback,
        }
    }

    async fn structured_call(
        &self,
        step: &'static str,
        system_prompt: &str,
        user_prompt: &str,
        initial_budget: u32,
        expected_len: Option<usize>,
    ) -> Result<Vec<RawVariant>, LlmError> {
        retry_with_budget(initial_budget, |budget| async move {
            let raw = self
                .generator
                .generate_json(system_prompt, user_prompt, budget)
                .await
                .map_err(|source| LlmError::Provider { step, source })?;
            let items = parse_items(step, &raw)?;
            if let Some(expected) = expected_len {
                if items.len() != expected {
                    return Err(LlmError::Decode {
                        step,
                        reason: format!("expected {expected} items, got {}", items.len()),
                    });
                }
            }
            Ok(items)
        })
        .await
    }

    async fn run(
        &self,
        variants: &[RawVariant],
        request: &SummaryRequest<'_>,
    ) -> Result<Vec<NormalizedPriceLine>, LlmError> {
        let translate_prompt = json!({
            "target_lang": request.target_lang,
            "title": request.title,
            "description": request.description.map(|d| truncate_chars(d, MAX_DESCRIPTION_CHARS)),
            "items": variants,
        })
        .to_string();
        let translated = self
            .structured_call(
                "translate",
                TRANSLATE_SYSTEM_PROMPT,
                &translate_prompt,
                request.token_budget,
                Some(variants.len()),
            )
            .await?;

        let summarize_prompt = json!({
            "target_lang": request.target_lang,
            "title": request.title,
            "items": translated,
        })
        .to_string();
        let clustered = self
            .structured_call(
                "summarize",
                SUMMARIZE_SYSTEM_PROMPT,
                &summarize_prompt,
                request.token_budget,
                None,
            )
            .await?;

        let input_prices: HashSet<Decimal> = variants.iter().map(|v| v.price).collect();
        let accepted: Vec<RawVariant> = clustered
            .into_iter()
            .filter(|item| {
                if !input_prices.contains(&item.price) {
                    tracing::warn!(label = %item.label, price = %item.price, "model invented a price, dropping line");
                    return false;
                }
                if classify(&item.label).is_invalid() {
                    tracing::debug!(label = %item.label, "color-only label from model, dropping line");
                    return false;
                }
                true
            })
            .collect();

        let lines = group_by_price(&accepted)
            .into_iter()
            .flat_map(|group| {
                merge_labels(group.labels())
                    .into_iter()
                    .map(move |label| NormalizedPriceLine::new(label, group.price))
            })
            .collect();
        Ok(lines)
    }
}

#[async_trait]
impl PriceSummarizer for LlmSummarizer {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn summarize(
        &self,
        variants: &[RawVariant],
        request: &SummaryRequest<'_>,
    ) -> Vec<NormalizedPriceLine> {
        let mut lines = match self.run(variants, request).await {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(error = %err, "LLM price summary failed, using rule-based summary");
                return self.fallback.summarize(variants, request).await;
            }
        };

        let covered: HashSet<Decimal> = lines.iter().map(|line| line.price).collect();
        let missing: Vec<RawVariant> = variants
            .iter()
            .filter(|variant| !covered.contains(&variant.price))
            .cloned()
            .collect();
        if !missing.is_empty() {
            tracing::info!(
                missing_variants = missing.len(),
                "LLM summary left prices out, filling them in by rules"
            );
            lines.extend(self.fallback.summarize(&missing, request).await);
        }
        lines
    }
}

impl std::fmt::Debug for LlmSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmSummarizer")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

/// Parses a model answer into `(label, price)` items.
///
/// Accepts a bare JSON array or an object with an `items` array, optionally
/// wrapped in a Markdown code fence. Items without a label or a positive
/// price are skipped; an answer with no usable item is a decode error.
fn parse_items(step: &'static str, raw: &str) -> Result<Vec<RawVariant>, LlmError> {
    let decode = |reason: String| LlmError::Decode { step, reason };

    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|err| decode(err.to_string()))?;
    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(decode("object without an `items` array".to_owned())),
        },
        _ => return Err(decode("expected a JSON array".to_owned())),
    };

    let parsed: Vec<RawVariant> = items
        .iter()
        .filter_map(|item| {
            let label = item.get("label")?.as_str()?.trim();
            let price = parse_price(item.get("price")?)?;
            (!label.is_empty()).then(|| RawVariant::new(label, price))
        })
        .collect();

    if parsed.is_empty() && !items.is_empty() {
        return Err(decode("no item had both a label and a price".to_owned()));
    }
    Ok(parsed)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}

#[cfg(test)]
#[path = "llm_test.rs"]
mod tests;
