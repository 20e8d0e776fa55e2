//! Command handlers. Each reads a raw listing, runs the engine, and prints
//! JSON to stdout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use mpbot_core::{EngineConfig, RawListing};
use mpbot_normalizer::{CollaboratorError, DetailFetcher, ListingNormalizer, Providers};
use serde::Serialize;

/// Serves a detail fragment from a local file regardless of item id.
pub(crate) struct FileDetailFetcher {
    path: PathBuf,
}

impl FileDetailFetcher {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl DetailFetcher for FileDetailFetcher {
    async fn fetch_item_detail(&self, item_id: &str) -> Result<String, CollaboratorError> {
        tracing::debug!(item_id, path = %self.path.display(), "reading detail fragment");
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CollaboratorError::new(format!("reading {}: {e}", self.path.display()))
        })
    }
}

pub(crate) async fn run_normalize(
    mut config: EngineConfig,
    input: &Path,
    detail_html: Option<PathBuf>,
    no_probe: bool,
) -> anyhow::Result<()> {
    if no_probe {
        config.probe_detail_images = false;
    }
    let listing = read_listing(input).await?;
    let normalizer = build_normalizer(&config, detail_html)?;
    let normalized = normalizer.normalize(&listing).await?;
    print_json(&normalized)
}

pub(crate) async fn run_prices(config: &EngineConfig, input: &Path) -> anyhow::Result<()> {
    let listing = read_listing(input).await?;
    let normalizer = build_normalizer(config, None)?;
    let lines = normalizer.price_lines(&listing).await;
    if lines.is_empty() {
        tracing::info!("listing has a single price; no price lines");
    }
    print_json(&lines)
}

pub(crate) async fn run_images(
    config: &EngineConfig,
    input: &Path,
    detail_html: Option<PathBuf>,
) -> anyhow::Result<()> {
    let listing = read_listing(input).await?;
    let normalizer = build_normalizer(config, detail_html)?;
    let urls = normalizer.image_urls(&listing).await?;
    print_json(&urls)
}

fn build_normalizer(
    config: &EngineConfig,
    detail_html: Option<PathBuf>,
) -> anyhow::Result<ListingNormalizer> {
    let mut providers = Providers::default();
    if let Some(path) = detail_html {
        providers = providers.with_detail(Arc::new(FileDetailFetcher::new(path)));
    }
    ListingNormalizer::new(config, providers).context("failed to build listing normalizer")
}

pub(crate) async fn read_listing(path: &Path) -> anyhow::Result<RawListing> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_listing(&raw).with_context(|| format!("invalid listing JSON in {}", path.display()))
}

pub(crate) fn parse_listing(raw: &str) -> Result<RawListing, serde_json::Error> {
    serde_json::from_str(raw)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
