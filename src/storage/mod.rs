//! Object-storage concerns: source-URI parsing and time-limited download
//! links issued by the storage service.

pub mod signer;

use async_trait::async_trait;
use thiserror::Error;

pub use signer::SigningGateway;

pub const DEFAULT_LINK_EXPIRY_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("storage credentials missing or rejected")]
    Unauthorized,
    #[error("signing request failed: {0}")]
    Request(String),
}

#[async_trait]
pub trait LinkSigner: Send + Sync {
    /// Request a fresh time-limited download URL for one object.
    async fn sign(&self, bucket: &str, key: &str, expires_in: u64)
        -> Result<String, SignerError>;
}

/// Split a storage URI (`s3://bucket/key/with/slashes`) into bucket and key.
///
/// The key keeps any embedded `/`; a URI with no path segment after the
/// bucket yields an empty key.
pub fn parse_s3_uri(uri: &str) -> (&str, &str) {
    let rest = uri.strip_prefix("s3://").unwrap_or(uri);
    match rest.split_once('/') {
        Some((bucket, key)) => (bucket, key),
        None => (rest, ""),
    }
}

/// Resolve a storage URI to a signed download link.
///
/// Signing failures never abort the turn: a credential failure (the
/// well-defined `Unauthorized` kind) and any residual signing failure both
/// degrade to an empty string, which callers render as "link unavailable".
/// Links are never cached, each call issues an independently-expiring URL.
pub async fn resolve_source_link(signer: &dyn LinkSigner, uri: &str, expires_in: u64) -> String {
    let (bucket, key) = parse_s3_uri(uri);
    match signer.sign(bucket, key, expires_in).await {
        Ok(url) => url,
        Err(SignerError::Unauthorized) => {
            tracing::error!("storage credentials unavailable, source link for {} omitted", uri);
            String::new()
        }
        Err(err) => {
            tracing::warn!("signing {} failed: {}", uri, err);
            String::new()
        }
    }
}
