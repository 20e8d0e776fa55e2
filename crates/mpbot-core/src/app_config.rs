/// Thresholds for the image quality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFilterThresholds {
    /// Reject images whose width or height is below this many pixels.
    pub min_side_px: u32,
    /// Reject images lighter than this many bytes (only when size is known).
    pub min_bytes: u64,
    /// Accepted `width / height` range; anything outside is a banner.
    pub min_aspect: f64,
    pub max_aspect: f64,
    /// Accepted `area / median_area` range.
    pub min_area_ratio: f64,
    pub max_area_ratio: f64,
    /// Allowed relative deviation from the median aspect ratio.
    pub aspect_tolerance: f64,
}

impl Default for ImageFilterThresholds {
    fn default() -> Self {
        Self {
            min_side_px: 150,
            min_bytes: 20 * 1024,
            min_aspect: 0.2,
            max_aspect: 5.0,
            min_area_ratio: 0.6,
            max_area_ratio: 1.7,
            aspect_tolerance: 0.4,
        }
    }
}

/// Engine configuration, built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub log_level: String,
    /// Language code handed to the translation collaborator.
    pub target_lang: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Number of detail images probed concurrently per batch.
    pub probe_batch_size: usize,
    /// Size of the initial byte-range request.
    pub probe_range_bytes: u64,
    /// Cap for the full-download fallback.
    pub probe_max_bytes: u64,
    /// Whether detail images without an explicit size are probed at all.
    pub probe_detail_images: bool,
    /// Initial token budget for structured LLM calls.
    pub llm_token_budget: u32,
    /// Maximum number of image URLs in the final output.
    pub max_images: usize,
    pub filter: ImageFilterThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            target_lang: "ru".to_string(),
            http_timeout_secs: 15,
            user_agent: "mpbot/0.1 (listing-normalizer)".to_string(),
            probe_batch_size: 5,
            probe_range_bytes: 64 * 1024,
            probe_max_bytes: 2 * 1024 * 1024,
            probe_detail_images: true,
            llm_token_budget: 4000,
            max_images: 10,
            filter: ImageFilterThresholds::default(),
        }
    }
}
