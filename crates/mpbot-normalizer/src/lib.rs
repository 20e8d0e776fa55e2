//! Listing normalization engine.
//!
//! Turns a noisy [`mpbot_core::RawListing`] into a presentable
//! [`mpbot_core::NormalizedListing`]: a handful of price lines and a
//! de-duplicated, quality-filtered image sequence.
//!
//! The price pipeline runs extraction, variant-type normalization,
//! summarization (LLM-assisted or rule-based) and label merging. The image
//! pipeline runs source selection, detail-image discovery and probing, and
//! statistical quality filtering. The two are independent and are composed
//! by [`ListingNormalizer`].

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod images;
pub mod prices;

mod retry;

pub use collaborators::{DetailFetcher, JsonGenerator, Providers, Translator};
pub use engine::ListingNormalizer;
pub use error::{CollaboratorError, LlmError, NormalizeError};
