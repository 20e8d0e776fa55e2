use thiserror::Error;

/// Failure reported by an external collaborator (translator, LLM, detail source).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct CollaboratorError(String);

impl CollaboratorError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("image at {url} exceeds the {limit_bytes}-byte download cap")]
    OversizedImage { url: String, limit_bytes: u64 },

    #[error("could not read image dimensions from {url}: {reason}")]
    ImageDecode { url: String, reason: String },

    #[error("collaborator failure during {stage}: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: CollaboratorError,
    },

    #[error("listing is missing required field `{0}`")]
    MissingField(&'static str),
}

/// Errors from the structured-LLM summarization path.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The model answered, but not with the JSON shape we asked for.
    #[error("malformed model output in {step}: {reason}")]
    Decode { step: &'static str, reason: String },

    /// The provider itself failed (network, quota, refusal).
    #[error("provider failure in {step}: {source}")]
    Provider {
        step: &'static str,
        #[source]
        source: CollaboratorError,
    },
}
