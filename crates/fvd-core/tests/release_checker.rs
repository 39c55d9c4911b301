use std::sync::Arc;
use std::time::Duration;

use fvd_core::{
    RELEASE_ASSET_ZIP, ReleaseCache, ReleaseChecker, ReleasePayload, UpdateError, http_client,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Answer exactly one HTTP request with `status` and `body`, returning the
/// raw request text.
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept connection");
        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            let read = stream.read(&mut buffer).await.expect("read request");
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        stream.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}"), handle)
}

fn checker(api_base: &str, cache: &Arc<ReleaseCache>) -> ReleaseChecker {
    let client = http_client(Duration::from_secs(5)).expect("client should build");
    ReleaseChecker::new(client, Arc::clone(cache))
        .with_api_base(api_base)
        .with_repo("owner/plugin")
}

fn release_body(tag: &str, asset: &str) -> String {
    serde_json::json!({
        "tag_name": tag,
        "html_url": format!("https://github.com/owner/plugin/releases/tag/{tag}"),
        "published_at": "2026-05-04T12:00:00Z",
        "assets": [
            { "name": "checksums.txt", "browser_download_url": "https://example.com/checksums.txt" },
            { "name": asset, "browser_download_url": format!("https://example.com/{tag}/{asset}") }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn newer_release_is_offered_and_cached() {
    let (base, server) = serve_once("200 OK", release_body("v1.3.0", RELEASE_ASSET_ZIP)).await;
    let cache = Arc::new(ReleaseCache::default());

    let update = checker(&base, &cache)
        .check_for_update("1.2.0")
        .await
        .expect("1.3.0 should be offered over 1.2.0");

    assert_eq!(update.new_version, "1.3.0");
    assert_eq!(
        update.package_url,
        format!("https://example.com/v1.3.0/{RELEASE_ASSET_ZIP}")
    );
    assert!(update.release_url.ends_with("/releases/tag/v1.3.0"));

    let cached = cache.get().expect("successful fetch should be cached");
    assert_eq!(cached.tag_name, "1.3.0");
    assert_eq!(cached.published_at, "2026-05-04T12:00:00Z");

    let request = server.await.expect("server task").to_ascii_lowercase();
    assert!(request.starts_with("get /repos/owner/plugin/releases/latest "));
    assert!(request.contains("accept: application/vnd.github+json"));
    assert!(request.contains("user-agent: fvd-mobile-bottom-bar"));
}

#[tokio::test]
async fn same_version_release_is_not_offered_but_still_cached() {
    let (base, _server) = serve_once("200 OK", release_body("1.2.0", RELEASE_ASSET_ZIP)).await;
    let cache = Arc::new(ReleaseCache::default());

    assert!(checker(&base, &cache).check_for_update("1.2.0").await.is_none());
    assert!(cache.get().is_some());
}

#[tokio::test]
async fn not_found_yields_no_update_and_empty_cache() {
    let (base, _server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#.to_string()).await;
    let cache = Arc::new(ReleaseCache::default());
    let checker = checker(&base, &cache);

    assert!(checker.check_for_update("1.0.0").await.is_none());
    assert!(cache.snapshot().is_none());
}

#[tokio::test]
async fn not_found_reports_status_error() {
    let (base, _server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#.to_string()).await;
    let cache = Arc::new(ReleaseCache::default());

    let error = checker(&base, &cache)
        .fetch_release_payload()
        .await
        .expect_err("404 should be an error");

    assert!(matches!(error, UpdateError::HttpStatus { status, .. } if status.as_u16() == 404));
    assert!(error.to_string().contains("Not Found"));
}

#[tokio::test]
async fn release_without_expected_asset_yields_no_update_and_empty_cache() {
    let (base, _server) = serve_once("200 OK", release_body("9.0.0", "other-plugin.zip")).await;
    let cache = Arc::new(ReleaseCache::default());

    assert!(checker(&base, &cache).check_for_update("1.0.0").await.is_none());
    assert!(cache.snapshot().is_none());
}

#[tokio::test]
async fn malformed_body_yields_no_update() {
    let (base, _server) = serve_once("200 OK", "<html>rate limited</html>".to_string()).await;
    let cache = Arc::new(ReleaseCache::default());

    assert!(checker(&base, &cache).check_for_update("1.0.0").await.is_none());
    assert!(cache.snapshot().is_none());
}

#[tokio::test]
async fn unreachable_endpoint_yields_no_update() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    let cache = Arc::new(ReleaseCache::default());

    assert!(
        checker(&format!("http://{addr}"), &cache)
            .check_for_update("1.0.0")
            .await
            .is_none()
    );
    assert!(cache.snapshot().is_none());
}

#[tokio::test]
async fn fresh_cache_entry_skips_the_network() {
    let cache = Arc::new(ReleaseCache::default());
    cache.store(ReleasePayload {
        tag_name: "1.3.0".to_string(),
        zip_url: "https://example.com/fvd.zip".to_string(),
        html_url: "https://example.com/release".to_string(),
        published_at: String::new(),
    });
    // Nothing listens here; a request would fail and yield no update.
    let checker = checker("http://127.0.0.1:9", &cache);

    let update = checker.check_for_update("1.2.0").await;
    assert_eq!(
        update.map(|update| update.new_version),
        Some("1.3.0".to_string())
    );
    assert!(checker.check_for_update("1.3.0").await.is_none());
}
