//! Integration tests for `ImageProber`.
//!
//! Uses `wiremock` to serve generated images so no real network traffic is
//! made. Covers the range-probe happy path, the full-download fallback, the
//! download cap (declared and streamed), and per-image failure isolation
//! within a batch.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mpbot_core::EngineConfig;
use mpbot_normalizer::images::ImageProber;
use mpbot_normalizer::NormalizeError;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::new_rgb8(width, height)
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("failed to encode test image");
    buf
}

fn test_prober(max_bytes: u64) -> ImageProber {
    let config = EngineConfig {
        http_timeout_secs: 5,
        user_agent: "mpbot-test/0.1".to_string(),
        probe_max_bytes: max_bytes,
        ..EngineConfig::default()
    };
    ImageProber::new(&config).expect("failed to build test ImageProber")
}

fn partial(body: Vec<u8>, total: usize) -> ResponseTemplate {
    let end = body.len().saturating_sub(1);
    ResponseTemplate::new(206)
        .insert_header("Content-Range", format!("bytes 0-{end}/{total}").as_str())
        .set_body_bytes(body)
}

// ---------------------------------------------------------------------------
// Test 1 – range request is enough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn range_probe_reads_jpeg_dimensions_without_full_download() {
    let server = MockServer::start().await;
    let jpeg = encode(300, 300, ImageFormat::Jpeg);
    let total = jpeg.len();

    Mock::given(method("GET"))
        .and(path("/item/1.jpg"))
        .and(header("Range", "bytes=0-65535"))
        .respond_with(partial(jpeg, total))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/item/1.jpg", server.uri());
    let candidate = test_prober(2 * 1024 * 1024)
        .probe(&url)
        .await
        .expect("probe should succeed");

    assert_eq!(candidate.dimensions(), Some((300, 300)));
    assert_eq!(candidate.byte_size, Some(total as u64));

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1, "no full download after a good range probe");
}

// ---------------------------------------------------------------------------
// Test 2 – undecodable range response falls back to a full GET
// ---------------------------------------------------------------------------

#[tokio::test]
async fn falls_back_to_full_download_when_range_is_undecodable() {
    let server = MockServer::start().await;
    let png = encode(640, 480, ImageFormat::Png);
    let png_len = png.len();

    Mock::given(method("GET"))
        .and(path("/item/2.png"))
        .and(header("Range", "bytes=0-65535"))
        .respond_with(partial(b"not an image".to_vec(), 100_000))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/2.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/item/2.png", server.uri());
    let candidate = test_prober(2 * 1024 * 1024)
        .probe(&url)
        .await
        .expect("full download should succeed");

    assert_eq!(candidate.dimensions(), Some((640, 480)));
    assert_eq!(candidate.byte_size, Some(png_len as u64));
}

// ---------------------------------------------------------------------------
// Test 3 – images over the cap are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_full_download_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item/3.jpg"))
        .and(header("Range", "bytes=0-65535"))
        .respond_with(ResponseTemplate::new(416))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item/3.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 4096]))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/item/3.jpg", server.uri());
    let err = test_prober(1024)
        .probe(&url)
        .await
        .expect_err("4 KB body must exceed a 1 KB cap");

    assert!(
        matches!(err, NormalizeError::OversizedImage { limit_bytes: 1024, .. }),
        "expected OversizedImage, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 3b – chunked bodies without Content-Length are cut off while streaming
// ---------------------------------------------------------------------------

/// Serves every connection a 200 with a 4 KB chunked body and no
/// `Content-Length`, which `ResponseTemplate` cannot express.
async fn spawn_chunked_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let mut response = b"HTTP/1.1 200 OK\r\nContent-Type: image/jpeg\r\n\
                    Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n"
                    .to_vec();
                for _ in 0..4 {
                    response.extend_from_slice(b"400\r\n");
                    response.extend_from_slice(&[0u8; 1024]);
                    response.extend_from_slice(b"\r\n");
                }
                response.extend_from_slice(b"0\r\n\r\n");
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn oversized_chunked_download_is_rejected_while_streaming() {
    let base = spawn_chunked_server().await;

    let url = format!("{base}/item/chunked.jpg");
    let err = test_prober(1024)
        .probe(&url)
        .await
        .expect_err("4 KB chunked body must exceed a 1 KB cap");

    assert!(
        matches!(err, NormalizeError::OversizedImage { limit_bytes: 1024, .. }),
        "expected OversizedImage, got: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// Test 4 – one failing URL does not sink its batch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_probe_is_isolated_within_batch() {
    let server = MockServer::start().await;
    let jpeg = encode(400, 400, ImageFormat::Jpeg);
    let total = jpeg.len();

    Mock::given(method("GET"))
        .respond_with(partial(jpeg, total))
        .mount(&server)
        .await;

    let urls: Vec<String> = (1..=7)
        .map(|n| {
            if n == 3 {
                // Nothing listens on port 1: connection refused.
                "http://127.0.0.1:1/item/3.jpg".to_string()
            } else {
                format!("{}/item/{n}.jpg", server.uri())
            }
        })
        .collect();

    let results = test_prober(2 * 1024 * 1024).probe_all(&urls).await;

    assert_eq!(results.len(), 7);
    assert!(results[2].is_none());
    let successes: Vec<_> = results.iter().flatten().collect();
    assert_eq!(successes.len(), 6);
    assert!(successes
        .iter()
        .all(|c| c.dimensions() == Some((400, 400))));
    assert_eq!(successes[2].url, urls[3]);
}

// ---------------------------------------------------------------------------
// Test 5 – sized candidates are never fetched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn resolve_dimensions_only_probes_unsized_candidates() {
    use mpbot_core::{ImageCandidate, ImageOrigin};

    let server = MockServer::start().await;
    let jpeg = encode(500, 500, ImageFormat::Jpeg);
    let total = jpeg.len();

    Mock::given(method("GET"))
        .and(path("/unsized.jpg"))
        .respond_with(partial(jpeg, total))
        .expect(1)
        .mount(&server)
        .await;

    let candidates = vec![
        ImageCandidate::new(format!("{}/sized.jpg", server.uri()), ImageOrigin::Detail)
            .with_dimensions(750, 1000),
        ImageCandidate::new(format!("{}/unsized.jpg", server.uri()), ImageOrigin::Detail),
        ImageCandidate::new(format!("{}/missing.jpg", server.uri()), ImageOrigin::Detail),
    ];

    let resolved = test_prober(2 * 1024 * 1024)
        .resolve_dimensions(candidates)
        .await;

    assert_eq!(resolved.len(), 2, "the 404 candidate is dropped");
    assert_eq!(resolved[0].dimensions(), Some((750, 1000)));
    assert_eq!(resolved[1].dimensions(), Some((500, 500)));
}
