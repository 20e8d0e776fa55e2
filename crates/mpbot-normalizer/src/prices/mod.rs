//! Price pipeline: raw SKUs to a handful of presentable price lines.

pub mod extract;
mod lexicon;
pub mod merge;
pub mod summarize;
pub mod variant_type;

pub use extract::{distinct_price_count, extract_variants, group_by_price, parse_price};
pub use merge::merge_labels;
pub use summarize::{
    select_summarizer, summarize_prices, LlmSummarizer, PriceSummarizer, RuleSummarizer,
    SummaryRequest,
};
pub use variant_type::{classify, VariantType};
