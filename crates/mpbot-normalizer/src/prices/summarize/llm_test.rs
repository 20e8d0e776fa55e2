use super::*;
use crate::collaborators::Translator;
use crate::error::CollaboratorError;
use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Mutex;

/// Answers from a fixed script and records the token limit of every call.
struct Scripted {
    answers: Mutex<VecDeque<Result<String, CollaboratorError>>>,
    budgets: Mutex<Vec<u32>>,
}

impl Scripted {
    fn new(answers: Vec<Result<&str, &str>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .map(|a| a.map(str::to_owned).map_err(CollaboratorError::new))
                    .collect(),
            ),
            budgets: Mutex::new(Vec::new()),
        })
    }

    fn budgets(&self) -> Vec<u32> {
        self.budgets.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonGenerator for Scripted {
    async fn generate_json(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        token_limit: u32,
    ) -> Result<String, CollaboratorError> {
        self.budgets.lock().unwrap().push(token_limit);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CollaboratorError::new("script exhausted")))
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn request() -> SummaryRequest<'static> {
    SummaryRequest {
        title: "Комплект одежды",
        description: Some("Летняя коллекция"),
        target_lang: "ru",
        token_budget: 1000,
    }
}

fn variants() -> Vec<RawVariant> {
    vec![
        RawVariant::new("XS 长袖", dec("158")),
        RawVariant::new("S 长袖", dec("158")),
        RawVariant::new("短裤", dec("118")),
    ]
}

const TRANSLATED: &str = r#"[
    {"label": "XS майка", "price": "158"},
    {"label": "S майка", "price": "158"},
    {"label": "шорты", "price": "118"}
]"#;

fn summarizer(generator: Arc<Scripted>) -> LlmSummarizer {
    LlmSummarizer::new(generator, RuleSummarizer::default())
}

#[tokio::test]
async fn translates_then_clusters() {
    let generator = Scripted::new(vec![
        Ok(TRANSLATED),
        Ok(r#"{"items": [{"label": "майка", "price": 158}, {"label": "шорты", "price": "118"}]}"#),
    ]);

    let lines = summarizer(generator.clone())
        .summarize(&variants(), &request())
        .await;

    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("майка", dec("158")),
            NormalizedPriceLine::new("шорты", dec("118")),
        ]
    );
    assert_eq!(generator.budgets(), vec![1000, 1000]);
}

#[tokio::test]
async fn malformed_answer_is_retried_with_larger_budget() {
    let generator = Scripted::new(vec![
        Ok(r#"[{"label": "XS майка", "pri"#),
        Ok(TRANSLATED),
        Ok(r#"[{"label": "майка", "price": "158"}, {"label": "шорты", "price": "118"}]"#),
    ]);

    let lines = summarizer(generator.clone())
        .summarize(&variants(), &request())
        .await;

    assert_eq!(lines.len(), 2);
    assert_eq!(generator.budgets(), vec![1000, 2000, 1000]);
}

#[tokio::test]
async fn wrong_translation_cardinality_counts_as_malformed() {
    let generator = Scripted::new(vec![
        Ok(r#"[{"label": "майка", "price": "158"}]"#),
        Ok(r#"[{"label": "майка", "price": "158"}]"#),
    ]);

    let lines = summarizer(generator.clone())
        .summarize(&variants(), &request())
        .await;

    assert_eq!(generator.budgets().len(), 2, "two attempts, then rules");
    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("лонгслив", dec("158")),
            NormalizedPriceLine::new("шорты", dec("118")),
        ]
    );
}

#[tokio::test]
async fn provider_failure_falls_back_without_retry() {
    let generator = Scripted::new(vec![Err("quota exceeded")]);

    let lines = summarizer(generator.clone())
        .summarize(&variants(), &request())
        .await;

    assert_eq!(generator.budgets().len(), 1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], NormalizedPriceLine::new("шорты", dec("118")));
}

#[tokio::test]
async fn invented_prices_are_dropped_and_missing_prices_filled_by_rules() {
    let generator = Scripted::new(vec![
        Ok(TRANSLATED),
        Ok(r#"[{"label": "майка", "price": "158"}, {"label": "носки", "price": "999"}]"#),
    ]);

    let lines = summarizer(generator)
        .summarize(&variants(), &request())
        .await;

    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("майка", dec("158")),
            NormalizedPriceLine::new("шорты", dec("118")),
        ]
    );
}

#[tokio::test]
async fn color_only_model_labels_are_dropped() {
    let generator = Scripted::new(vec![
        Ok(TRANSLATED),
        Ok(r#"[{"label": "розовый", "price": "158"}, {"label": "шорты", "price": "118"}]"#),
    ]);

    let lines = summarizer(generator)
        .summarize(&variants(), &request())
        .await;

    // 158 came back color-only, so the rules fill it in from the raw labels.
    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("шорты", dec("118")),
            NormalizedPriceLine::new("лонгслив", dec("158")),
        ]
    );
}

/// Replaces known Chinese garment words, line by line.
struct Glossary;

#[async_trait]
impl Translator for Glossary {
    async fn translate(&self, text: &str, _target_lang: &str) -> Result<String, CollaboratorError> {
        Ok(text.replace("帽子", "шапка").replace("短裤", "шорты"))
    }
}

#[tokio::test]
async fn omitted_color_only_price_takes_the_title_type() {
    let variants = vec![
        RawVariant::new("白色", dec("158")),
        RawVariant::new("短裤", dec("118")),
    ];
    let request = SummaryRequest {
        title: "连衣裙",
        ..request()
    };
    let generator = Scripted::new(vec![
        Ok(r#"[{"label": "белый", "price": "158"}, {"label": "шорты", "price": "118"}]"#),
        Ok(r#"[{"label": "шорты", "price": "118"}]"#),
    ]);

    let lines = summarizer(generator).summarize(&variants, &request).await;

    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("шорты", dec("118")),
            NormalizedPriceLine::new("платье", dec("158")),
        ]
    );
}

#[tokio::test]
async fn omitted_prices_are_translated_by_the_fallback() {
    let variants = vec![
        RawVariant::new("帽子", dec("158")),
        RawVariant::new("短裤", dec("118")),
    ];
    let generator = Scripted::new(vec![
        Ok(r#"[{"label": "шапка", "price": "158"}, {"label": "шорты", "price": "118"}]"#),
        Ok(r#"[{"label": "шорты", "price": "118"}]"#),
    ]);
    let summarizer = LlmSummarizer::new(generator, RuleSummarizer::new(Some(Arc::new(Glossary))));

    let lines = summarizer.summarize(&variants, &request()).await;

    assert_eq!(
        lines,
        vec![
            NormalizedPriceLine::new("шорты", dec("118")),
            NormalizedPriceLine::new("шапка", dec("158")),
        ]
    );
}

#[test]
fn parse_items_accepts_fenced_json() {
    let raw = "```json\n[{\"label\": \"майка\", \"price\": \"99,90\"}]\n```";
    let items = parse_items("summarize", raw).unwrap();
    assert_eq!(items, vec![RawVariant::new("майка", dec("99.9"))]);
}

#[test]
fn parse_items_rejects_non_array() {
    let err = parse_items("summarize", r#"{"label": "майка"}"#).unwrap_err();
    assert!(matches!(err, LlmError::Decode { step: "summarize", .. }));

    let err = parse_items("summarize", r#"[{"label": "", "price": "0"}]"#).unwrap_err();
    assert!(matches!(err, LlmError::Decode { .. }));
}

#[test]
fn truncate_chars_respects_char_boundaries() {
    assert_eq!(truncate_chars("платье", 3), "пла");
    assert_eq!(truncate_chars("abc", 10), "abc");
}
