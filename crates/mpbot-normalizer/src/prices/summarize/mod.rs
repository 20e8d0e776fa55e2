//! Price summarization strategies.
//!
//! Two interchangeable strategies turn [`RawVariant`]s into price lines:
//! [`LlmSummarizer`] (translate and cluster through a structured LLM call)
//! and [`RuleSummarizer`] (group by price, classify, merge). The engine picks
//! one per request with [`select_summarizer`] based on what the configured
//! providers support.

mod llm;
mod rules;

use std::collections::HashMap;

use async_trait::async_trait;
use mpbot_core::{NormalizedPriceLine, RawVariant};
use rust_decimal::Decimal;

use super::extract::distinct_price_count;
use crate::collaborators::Providers;

pub use llm::LlmSummarizer;
pub use rules::RuleSummarizer;

/// Listing context handed to a summarizer alongside the variants.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    /// ISO 639-1 code of the output language.
    pub target_lang: &'a str,
    /// Token budget for the first structured call.
    pub token_budget: u32,
}

#[async_trait]
pub trait PriceSummarizer: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    /// Produces price lines for `variants`. Never fails: collaborator
    /// problems degrade to a simpler strategy inside the implementation.
    async fn summarize(
        &self,
        variants: &[RawVariant],
        request: &SummaryRequest<'_>,
    ) -> Vec<NormalizedPriceLine>;
}

/// Picks the LLM-assisted strategy when a JSON-capable generator is
/// configured, the rule-based one otherwise.
#[must_use]
pub fn select_summarizer(providers: &Providers) -> Box<dyn PriceSummarizer> {
    let rules = RuleSummarizer::new(providers.translator.clone());
    match providers.json_generator() {
        Some(generator) => Box::new(LlmSummarizer::new(generator.clone(), rules)),
        None => Box::new(rules),
    }
}

/// Runs `summarizer` over `variants`.
///
/// Returns no lines when the variants carry at most one distinct price; the
/// caller then shows a single fallback price. Lines come back ordered by the
/// first occurrence of their price in `variants`, with exact duplicates
/// removed.
pub async fn summarize_prices(
    summarizer: &dyn PriceSummarizer,
    variants: &[RawVariant],
    request: &SummaryRequest<'_>,
) -> Vec<NormalizedPriceLine> {
    let distinct = distinct_price_count(variants);
    if distinct <= 1 {
        tracing::debug!(distinct, "single price, skipping price lines");
        return Vec::new();
    }

    let lines = summarizer.summarize(variants, request).await;
    tracing::debug!(
        strategy = summarizer.name(),
        variants = variants.len(),
        lines = lines.len(),
        "prices summarized"
    );
    order_by_first_occurrence(lines, variants)
}

fn order_by_first_occurrence(
    lines: Vec<NormalizedPriceLine>,
    variants: &[RawVariant],
) -> Vec<NormalizedPriceLine> {
    let mut rank: HashMap<Decimal, usize> = HashMap::new();
    for variant in variants {
        let next = rank.len();
        rank.entry(variant.price).or_insert(next);
    }

    let mut unique: Vec<NormalizedPriceLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if !unique.contains(&line) {
            unique.push(line);
        }
    }
    unique.sort_by_key(|line| rank.get(&line.price).copied().unwrap_or(usize::MAX));
    unique
}
