//! Contracts for the external collaborators the engine consumes.
//!
//! Implementations live outside this crate (HTTP LLM clients, scraper
//! back ends). Handles are read-only after construction and shared through
//! `Arc`, so one [`Providers`] value can serve concurrent requests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollaboratorError;

/// Plain text translation.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_lang` (ISO 639-1 code, e.g. `"ru"`).
    ///
    /// Multi-line input must come back with one output line per input line
    /// for batch translation to be used; otherwise the caller falls back to
    /// per-item calls.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, CollaboratorError>;
}

/// Text generation that can be asked for a JSON answer.
#[async_trait]
pub trait JsonGenerator: Send + Sync {
    /// Whether this provider honours structured (JSON) responses.
    ///
    /// The LLM-assisted price strategy is only selected when this is `true`.
    fn supports_json(&self) -> bool {
        true
    }

    /// Generate a response expected to parse as JSON.
    ///
    /// `token_limit` bounds the size of the answer.
    async fn generate_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        token_limit: u32,
    ) -> Result<String, CollaboratorError>;
}

/// Source of the item detail-page fragment (`<img>` markup).
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    async fn fetch_item_detail(&self, item_id: &str) -> Result<String, CollaboratorError>;
}

/// The set of collaborators available to one engine instance.
///
/// Every slot is optional; a missing collaborator disables the step that
/// needs it rather than failing the listing.
#[derive(Clone, Default)]
pub struct Providers {
    pub translator: Option<Arc<dyn Translator>>,
    pub generator: Option<Arc<dyn JsonGenerator>>,
    pub detail: Option<Arc<dyn DetailFetcher>>,
}

impl Providers {
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    #[must_use]
    pub fn with_generator(mut self, generator: Arc<dyn JsonGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Arc<dyn DetailFetcher>) -> Self {
        self.detail = Some(detail);
        self
    }

    /// The structured generator, if one is configured and supports JSON.
    #[must_use]
    pub fn json_generator(&self) -> Option<&Arc<dyn JsonGenerator>> {
        self.generator.as_ref().filter(|g| g.supports_json())
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers")
            .field("translator", &self.translator.is_some())
            .field("generator", &self.generator.is_some())
            .field("detail", &self.detail.is_some())
            .finish()
    }
}
