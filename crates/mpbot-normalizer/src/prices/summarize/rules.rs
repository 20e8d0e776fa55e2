//! Rule-based price summarization: no LLM involved.
//!
//! Variants are grouped by exact price, labels are translated (when a
//! translator is available), and each group collapses to its product type:
//!
//! - one type, one sub-variant after dropping sizes: `"майка"`
//! - one type, several sub-variants: `"майка в ассортименте"`
//! - several types: one line per type

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mpbot_core::{NormalizedPriceLine, RawVariant};

use super::{PriceSummarizer, SummaryRequest};
use crate::collaborators::Translator;
use crate::prices::extract::group_by_price;
use crate::prices::merge::merge_labels;
use crate::prices::variant_type::{classify, looks_suspicious, strip_sizes};

const ASSORTMENT_SUFFIX: &str = "в ассортименте";

/// Groups by price and collapses each group to product types.
#[derive(Clone, Default)]
pub struct RuleSummarizer {
    translator: Option<Arc<dyn Translator>>,
}

impl RuleSummarizer {
    #[must_use]
    pub fn new(translator: Option<Arc<dyn Translator>>) -> Self {
        Self { translator }
    }

    /// Maps each distinct label to its translation.
    ///
    /// Tries one batch call first (labels joined by newlines) and uses it only
    /// if the line count matches. Otherwise translates label by label,
    /// keeping the original text for any label whose call fails.
    async fn translate_labels(
        &self,
        labels: &[&str],
        target_lang: &str,
    ) -> HashMap<String, String> {
        let Some(translator) = &self.translator else {
            return labels
                .iter()
                .map(|label| ((*label).to_owned(), (*label).to_owned()))
                .collect();
        };

        match translator.translate(&labels.join("\n"), target_lang).await {
            Ok(batch) => {
                let lines: Vec<&str> = batch.lines().map(str::trim).collect();
                if lines.len() == labels.len() && lines.iter().all(|line| !line.is_empty()) {
                    return labels
                        .iter()
                        .zip(lines)
                        .map(|(label, line)| ((*label).to_owned(), line.to_owned()))
                        .collect();
                }
                tracing::debug!(
                    expected = labels.len(),
                    got = lines.len(),
                    "batch translation line count mismatch, translating per item"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "batch translation failed, translating per item");
            }
        }

        let mut translated = HashMap::with_capacity(labels.len());
        for label in labels {
            let text = match translator.translate(label, target_lang).await {
                Ok(text) if !text.trim().is_empty() => text.trim().to_owned(),
                Ok(_) => (*label).to_owned(),
                Err(err) => {
                    tracing::warn!(label, error = %err, "label translation failed, keeping original");
                    (*label).to_owned()
                }
            };
            translated.insert((*label).to_owned(), text);
        }
        translated
    }
}

#[async_trait]
impl PriceSummarizer for RuleSummarizer {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn summarize(
        &self,
        variants: &[RawVariant],
        request: &SummaryRequest<'_>,
    ) -> Vec<NormalizedPriceLine> {
        let mut distinct: Vec<&str> = Vec::new();
        for variant in variants {
            if !distinct.contains(&variant.label.as_str()) {
                distinct.push(&variant.label);
            }
        }
        let translations = self.translate_labels(&distinct, request.target_lang).await;
        let title_type = classify(request.title);

        let mut lines = Vec::new();
        for group in group_by_price(variants) {
            let translated: Vec<&str> = group
                .labels()
                .iter()
                .map(|label| translations.get(label).map_or(label.as_str(), String::as_str))
                .collect();

            let mut labels = collapse_group(&translated);
            if labels.is_empty() {
                // Every label was a bare color or size; fall back to the
                // listing title's type so the price is not lost.
                match title_type.label() {
                    Some(label) => labels.push(label.to_owned()),
                    None => {
                        tracing::debug!(price = %group.price, "no usable label for price, dropping");
                        continue;
                    }
                }
            }

            for label in drop_suspicious(labels) {
                lines.push(NormalizedPriceLine::new(label, group.price));
            }
        }
        lines
    }
}

impl std::fmt::Debug for RuleSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSummarizer")
            .field("translator", &self.translator.is_some())
            .finish()
    }
}

/// Collapses the translated labels of one price group to product-type labels.
/// Invalid labels are removed; an all-invalid group yields nothing.
fn collapse_group(labels: &[&str]) -> Vec<String> {
    let mut by_type: Vec<(String, Vec<String>)> = Vec::new();
    for label in labels {
        let kind = classify(label);
        let Some(type_label) = kind.label() else {
            continue;
        };
        let key = strip_sizes(label);
        match by_type.iter_mut().find(|(existing, _)| existing == type_label) {
            Some((_, keys)) => {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            None => by_type.push((type_label.to_owned(), vec![key])),
        }
    }

    match by_type.as_slice() {
        [] => Vec::new(),
        [(type_label, keys)] if keys.len() > 1 => {
            vec![format!("{type_label} {ASSORTMENT_SUFFIX}")]
        }
        [(type_label, _)] => vec![type_label.clone()],
        _ => merge_labels(
            &by_type
                .iter()
                .map(|(type_label, _)| type_label.clone())
                .collect::<Vec<_>>(),
        ),
    }
}

/// Drops boilerplate-looking labels when at least one normal label remains.
fn drop_suspicious(labels: Vec<String>) -> Vec<String> {
    if labels.iter().all(|label| looks_suspicious(label)) {
        return labels;
    }
    labels
        .into_iter()
        .filter(|label| !looks_suspicious(label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replaces known Chinese garment words, line by line.
    struct Glossary {
        calls: AtomicU32,
        fail_batches: bool,
    }

    impl Glossary {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                fail_batches: false,
            }
        }
    }

    #[async_trait]
    impl Translator for Glossary {
        async fn translate(
            &self,
            text: &str,
            _target_lang: &str,
        ) -> Result<String, CollaboratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_batches && text.contains('\n') {
                return Err(CollaboratorError::new("batch too large"));
            }
            Ok(text.replace("长袖", "майка").replace("短裤", "шорты"))
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request() -> SummaryRequest<'static> {
        SummaryRequest {
            title: "",
            description: None,
            target_lang: "ru",
            token_budget: 1000,
        }
    }

    fn scenario() -> Vec<RawVariant> {
        vec![
            RawVariant::new("XS 长袖", dec("158")),
            RawVariant::new("S 长袖", dec("158")),
            RawVariant::new("短裤", dec("118")),
        ]
    }

    #[tokio::test]
    async fn groups_by_type_ignoring_sizes() {
        let translator = Arc::new(Glossary::new());
        let summarizer = RuleSummarizer::new(Some(translator.clone()));

        let lines = summarizer.summarize(&scenario(), &request()).await;

        assert_eq!(
            lines,
            vec![
                NormalizedPriceLine::new("майка", dec("158")),
                NormalizedPriceLine::new("шорты", dec("118")),
            ]
        );
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1, "one batch call");
    }

    #[tokio::test]
    async fn falls_back_to_per_item_translation() {
        let translator = Arc::new(Glossary {
            fail_batches: true,
            ..Glossary::new()
        });
        let summarizer = RuleSummarizer::new(Some(translator.clone()));

        let lines = summarizer.summarize(&scenario(), &request()).await;

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "майка");
        // 1 failed batch + 3 distinct labels
        assert_eq!(translator.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn works_without_translator() {
        let lines = RuleSummarizer::default()
            .summarize(&scenario(), &request())
            .await;
        assert_eq!(
            lines,
            vec![
                NormalizedPriceLine::new("лонгслив", dec("158")),
                NormalizedPriceLine::new("шорты", dec("118")),
            ]
        );
    }

    #[test]
    fn same_type_with_sub_variants_is_an_assortment() {
        assert_eq!(
            collapse_group(&["майка красная", "майка синяя с вышивкой"]),
            vec!["майка в ассортименте"]
        );
    }

    #[test]
    fn mixed_types_stay_separate() {
        assert_eq!(collapse_group(&["майка", "шорты XL"]), vec!["майка", "шорты"]);
    }

    #[test]
    fn invalid_labels_are_removed() {
        assert_eq!(collapse_group(&["深粉色", "шорты"]), vec!["шорты"]);
        assert!(collapse_group(&["белый", "黑色"]).is_empty());
    }

    #[tokio::test]
    async fn all_invalid_group_uses_title_type() {
        let variants = vec![
            RawVariant::new("белый", dec("10")),
            RawVariant::new("черный", dec("10")),
            RawVariant::new("платье миди", dec("12")),
        ];
        let request = SummaryRequest {
            title: "Платье летнее",
            ..request()
        };
        let lines = RuleSummarizer::default().summarize(&variants, &request).await;
        assert_eq!(
            lines,
            vec![
                NormalizedPriceLine::new("платье", dec("10")),
                NormalizedPriceLine::new("платье", dec("12")),
            ]
        );
    }

    #[test]
    fn suspicious_labels_yield_to_real_ones() {
        let labels = vec!["шорты".to_string(), "доплата, ссылка".to_string()];
        assert_eq!(drop_suspicious(labels), vec!["шорты"]);

        let only = vec!["доплата, ссылка".to_string()];
        assert_eq!(drop_suspicious(only.clone()), only);
    }
}
