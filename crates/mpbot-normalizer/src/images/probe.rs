//! Pixel-dimension probing for detail images without an explicit size.
//!
//! Each image is first fetched with a byte-range request (64 KB by default),
//! which is enough for the header of every common format. If that does not
//! yield dimensions, the whole image is downloaded up to a hard cap; larger
//! images are rejected outright.

use std::io::Cursor;
use std::time::Duration;

use futures::future::join_all;
use image::ImageReader;
use mpbot_core::{EngineConfig, ImageCandidate, ImageOrigin};
use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};

use crate::error::NormalizeError;

/// Probes image URLs for pixel dimensions and byte size.
///
/// Probes run concurrently in fixed-size batches. A failed probe only ever
/// affects its own URL.
#[derive(Debug, Clone)]
pub struct ImageProber {
    client: Client,
    batch_size: usize,
    range_bytes: u64,
    max_bytes: u64,
}

impl ImageProber {
    /// Builds a prober with the configured timeout, `User-Agent`, batch size
    /// and byte limits.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &EngineConfig) -> Result<Self, NormalizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            batch_size: config.probe_batch_size.max(1),
            range_bytes: config.probe_range_bytes.max(1),
            max_bytes: config.probe_max_bytes,
        })
    }

    /// Probes one URL, returning a detail-origin candidate with dimensions.
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::Http`] on network failure of the full download
    /// - [`NormalizeError::UnexpectedStatus`] for a non-2xx full download
    /// - [`NormalizeError::OversizedImage`] when the image exceeds the cap
    /// - [`NormalizeError::ImageDecode`] when no dimensions can be read
    pub async fn probe(&self, url: &str) -> Result<ImageCandidate, NormalizeError> {
        match self.probe_range(url).await {
            Ok(candidate) => return Ok(candidate),
            Err(err) => {
                tracing::debug!(url, error = %err, "range probe failed, trying full download");
            }
        }
        self.probe_full(url).await
    }

    /// Probes every URL, batch by batch. The result is index-aligned with
    /// `urls`; failed probes are logged and come back as `None`.
    pub async fn probe_all(&self, urls: &[String]) -> Vec<Option<ImageCandidate>> {
        let mut results = Vec::with_capacity(urls.len());
        for batch in urls.chunks(self.batch_size) {
            let outcomes = join_all(batch.iter().map(|url| self.probe(url))).await;
            for (url, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(candidate) => results.push(Some(candidate)),
                    Err(err) => {
                        tracing::warn!(url = %url, error = %err, "image probe failed, dropping candidate");
                        results.push(None);
                    }
                }
            }
        }
        results
    }

    /// Fills in dimensions for the unsized candidates in `candidates`.
    ///
    /// Candidates that already have dimensions pass through untouched;
    /// unsized ones are probed and dropped if the probe fails. Order is kept.
    pub async fn resolve_dimensions(&self, candidates: Vec<ImageCandidate>) -> Vec<ImageCandidate> {
        let unsized_urls: Vec<String> = candidates
            .iter()
            .filter(|c| c.dimensions().is_none())
            .map(|c| c.url.clone())
            .collect();
        if unsized_urls.is_empty() {
            return candidates;
        }

        let mut probed = self.probe_all(&unsized_urls).await.into_iter();
        let mut resolved = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if candidate.dimensions().is_some() {
                resolved.push(candidate);
            } else if let Some(Some(found)) = probed.next() {
                resolved.push(ImageCandidate {
                    origin: candidate.origin,
                    ..found
                });
            }
        }
        tracing::debug!(
            probed = unsized_urls.len(),
            kept = resolved.len(),
            "detail image dimensions resolved"
        );
        resolved
    }

    async fn probe_range(&self, url: &str) -> Result<ImageCandidate, NormalizeError> {
        let response = self
            .client
            .get(url)
            .header(RANGE, format!("bytes=0-{}", self.range_bytes - 1))
            .send()
            .await?;
        let response = check_status(response, url)?;
        let total = total_size(&response);
        let head = read_prefix(response, self.range_bytes).await?;
        let (width, height) = decode_dimensions(url, &head)?;

        Ok(ImageCandidate::new(url, ImageOrigin::Detail)
            .with_dimensions(width, height)
            .with_byte_size(total))
    }

    async fn probe_full(&self, url: &str) -> Result<ImageCandidate, NormalizeError> {
        let oversized = || NormalizeError::OversizedImage {
            url: url.to_string(),
            limit_bytes: self.max_bytes,
        };

        let response = self.client.get(url).send().await?;
        let mut response = check_status(response, url)?;
        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(oversized());
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(oversized());
            }
            body.extend_from_slice(&chunk);
        }
        let (width, height) = decode_dimensions(url, &body)?;

        Ok(ImageCandidate::new(url, ImageOrigin::Detail)
            .with_dimensions(width, height)
            .with_byte_size(Some(body.len() as u64)))
    }
}

fn check_status(response: Response, url: &str) -> Result<Response, NormalizeError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(NormalizeError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

/// Full image size: the `Content-Range` total of a 206, or the
/// `Content-Length` of a plain 200.
fn total_size(response: &Response) -> Option<u64> {
    if response.status() == StatusCode::PARTIAL_CONTENT {
        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit_once('/'))
            .and_then(|(_, total)| total.trim().parse::<u64>().ok())
    } else {
        response.content_length()
    }
}

/// Reads at most `limit` bytes of the body; servers that ignore `Range`
/// are cut off rather than downloaded in full.
async fn read_prefix(mut response: Response, limit: u64) -> Result<Vec<u8>, NormalizeError> {
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        buf.extend_from_slice(&chunk);
        if buf.len() >= limit {
            buf.truncate(limit);
            break;
        }
    }
    Ok(buf)
}

fn decode_dimensions(url: &str, bytes: &[u8]) -> Result<(u32, u32), NormalizeError> {
    let decode_err = |reason: String| NormalizeError::ImageDecode {
        url: url.to_string(),
        reason,
    };
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?
        .into_dimensions()
        .map_err(|e| decode_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn decodes_dimensions_from_a_body_prefix() {
        let bytes = png(320, 240);
        let head = &bytes[..bytes.len().min(1024)];
        assert_eq!(decode_dimensions("https://x/a.png", head).unwrap(), (320, 240));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_dimensions("https://x/a.png", b"<html>not an image</html>").unwrap_err();
        assert!(matches!(err, NormalizeError::ImageDecode { .. }));
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let config = EngineConfig {
            probe_batch_size: 0,
            ..EngineConfig::default()
        };
        let prober = ImageProber::new(&config).unwrap();
        assert_eq!(prober.batch_size, 1);
    }
}
