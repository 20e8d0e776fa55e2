//! The [`ListingNormalizer`] orchestrator.

use mpbot_core::{EngineConfig, ImageCandidate, NormalizedListing, NormalizedPriceLine, RawListing};

use crate::collaborators::Providers;
use crate::error::NormalizeError;
use crate::images::{filter_images, parse_detail_images, select_image_source, ImageProber};
use crate::prices::{extract_variants, select_summarizer, summarize_prices, SummaryRequest};

/// Runs the price and image pipelines for one listing at a time.
///
/// Holds only read-only state (configuration, collaborator handles and the
/// probe HTTP client), so one instance can serve concurrent requests.
#[derive(Debug)]
pub struct ListingNormalizer {
    config: EngineConfig,
    providers: Providers,
    prober: ImageProber,
}

impl ListingNormalizer {
    /// # Errors
    ///
    /// Returns [`NormalizeError::Http`] if the probe HTTP client cannot be built.
    pub fn new(config: &EngineConfig, providers: Providers) -> Result<Self, NormalizeError> {
        Ok(Self {
            config: config.clone(),
            prober: ImageProber::new(config)?,
            providers,
        })
    }

    /// Produces price lines and the final image list for `listing`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::MissingField`] when a detail fetcher is
    /// configured but the listing has no usable `item_id`. Collaborator and
    /// network failures never surface here; they degrade the result instead.
    pub async fn normalize(&self, listing: &RawListing) -> Result<NormalizedListing, NormalizeError> {
        let image_urls = self.image_urls(listing).await?;
        let price_lines = self.price_lines(listing).await;

        tracing::info!(
            item_id = listing.item_id().as_deref().unwrap_or("-"),
            price_lines = price_lines.len(),
            images = image_urls.len(),
            "listing normalized"
        );
        Ok(NormalizedListing {
            price_lines,
            image_urls,
        })
    }

    /// Runs only the price pipeline. Empty when the listing has at most one
    /// distinct price.
    pub async fn price_lines(&self, listing: &RawListing) -> Vec<NormalizedPriceLine> {
        let variants = extract_variants(&listing.skus);
        let summarizer = select_summarizer(&self.providers);
        let request = SummaryRequest {
            title: &listing.title,
            description: listing.description.as_deref(),
            target_lang: &self.config.target_lang,
            token_budget: self.config.llm_token_budget,
        };
        summarize_prices(summarizer.as_ref(), &variants, &request).await
    }

    /// Runs only the image pipeline: the selected source pool first, then
    /// the quality-filtered detail images, de-duplicated and capped at
    /// `max_images`.
    ///
    /// # Errors
    ///
    /// See [`ListingNormalizer::normalize`].
    pub async fn image_urls(&self, listing: &RawListing) -> Result<Vec<String>, NormalizeError> {
        let selection = select_image_source(listing);
        let detail = filter_images(self.detail_images(listing).await?, &self.config.filter);

        tracing::debug!(
            pool = ?selection.pool,
            selected = selection.urls.len(),
            detail = detail.len(),
            "image sources collected"
        );

        let mut urls = selection.urls;
        for candidate in detail {
            if !urls.contains(&candidate.url) {
                urls.push(candidate.url);
            }
        }
        urls.truncate(self.config.max_images);
        Ok(urls)
    }

    async fn detail_images(&self, listing: &RawListing) -> Result<Vec<ImageCandidate>, NormalizeError> {
        let Some(fetcher) = &self.providers.detail else {
            return Ok(Vec::new());
        };
        let item_id = listing
            .item_id()
            .ok_or(NormalizeError::MissingField("item_id"))?;

        let html = match fetcher.fetch_item_detail(&item_id).await {
            Ok(html) => html,
            Err(source) => {
                let err = NormalizeError::Collaborator {
                    stage: "fetch_item_detail",
                    source,
                };
                tracing::warn!(item_id, error = %err, "no detail images for listing");
                return Ok(Vec::new());
            }
        };

        let candidates = parse_detail_images(&html);
        if self.config.probe_detail_images {
            Ok(self.prober.resolve_dimensions(candidates).await)
        } else {
            Ok(candidates
                .into_iter()
                .filter(|c| c.dimensions().is_some())
                .collect())
        }
    }
}
