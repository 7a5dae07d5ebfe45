use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, RiskError};

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// What the network attempt produced, before the cache fallback rules
/// are applied.
pub enum FetchOutcome {
    Success(Vec<u8>),
    Failed(String),
}

/// Single-attempt GET with cache fallback. On a non-success status or
/// transport error the last cached payload is used instead; either way
/// the cache file is rewritten with the bytes handed to the caller.
pub async fn fetch_with_cache(
    client: &reqwest::Client,
    source: &'static str,
    url: &str,
    cache_path: &Path,
) -> Result<Vec<u8>> {
    let outcome = match client.get(url).send().await {
        Ok(resp) if resp.status().is_success() => match resp.bytes().await {
            Ok(bytes) => FetchOutcome::Success(bytes.to_vec()),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        },
        Ok(resp) => FetchOutcome::Failed(format!("status {}", resp.status())),
        Err(e) => FetchOutcome::Failed(e.to_string()),
    };
    resolve_payload(source, outcome, cache_path)
}

/// Applies the fallback rules: network bytes (BOM stripped) when the
/// request succeeded, otherwise the cached copy. A missing cache during
/// fallback is fatal. Kept synchronous so the rules are testable
/// without a network.
pub fn resolve_payload(
    source: &'static str,
    outcome: FetchOutcome,
    cache_path: &Path,
) -> Result<Vec<u8>> {
    let body = match outcome {
        FetchOutcome::Success(bytes) => {
            debug!(source, bytes = bytes.len(), "network fetch succeeded");
            strip_bom(bytes)
        }
        FetchOutcome::Failed(reason) => {
            warn!(source, %reason, "network fetch failed, falling back to cache");
            fs::read(cache_path).map_err(|_| RiskError::CacheMiss {
                source_name: source,
                path: cache_path.display().to_string(),
            })?
        }
    };

    if let Some(parent) = cache_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(cache_path, &body)?;

    Ok(body)
}

fn strip_bom(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.starts_with(&UTF8_BOM) {
        bytes[UTF8_BOM.len()..].to_vec()
    } else {
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn success_strips_bom_and_refreshes_cache() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("feed.json");

        let mut payload = UTF8_BOM.to_vec();
        payload.extend_from_slice(b"{\"data\":[]}");

        let body = resolve_payload("cdc", FetchOutcome::Success(payload), &cache).unwrap();
        assert_eq!(body, b"{\"data\":[]}");
        assert_eq!(fs::read(&cache).unwrap(), b"{\"data\":[]}");
    }

    #[test]
    fn success_without_bom_passes_through() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("feed.json");

        let body =
            resolve_payload("cdc", FetchOutcome::Success(b"{}".to_vec()), &cache).unwrap();
        assert_eq!(body, b"{}");
    }

    #[test]
    fn failure_falls_back_to_cached_copy() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("feed.json");
        fs::write(&cache, b"{\"cached\":true}").unwrap();

        let body = resolve_payload(
            "counties",
            FetchOutcome::Failed("status 503".into()),
            &cache,
        )
        .unwrap();
        assert_eq!(body, b"{\"cached\":true}");
        // The fallback rewrites the cache with its own content
        assert_eq!(fs::read(&cache).unwrap(), b"{\"cached\":true}");
    }

    #[test]
    fn failure_with_no_cache_is_fatal() {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("missing.json");

        let err = resolve_payload("cdc", FetchOutcome::Failed("timeout".into()), &cache)
            .unwrap_err();
        assert!(matches!(err, RiskError::CacheMiss { source_name: "cdc", .. }));
    }
}
