use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::{LinkSigner, SignerError};

/// Client for the storage service's signed-URL issuance endpoint.
#[derive(Clone)]
pub struct SigningGateway {
    base_url: String,
    api_token: String,
    client: Client,
}

impl SigningGateway {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl LinkSigner for SigningGateway {
    async fn sign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: u64,
    ) -> Result<String, SignerError> {
        let url = format!(
            "{}/{}/{}?presign",
            self.base_url,
            bucket,
            urlencoding::encode(key)
        );

        let body = json!({ "expiresIn": expires_in });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SignerError::Request(e.to_string()))?;

        match res.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SignerError::Unauthorized),
            status if !status.is_success() => {
                let text = res.text().await.unwrap_or_default();
                Err(SignerError::Request(format!(
                    "signing endpoint returned {}: {}",
                    status, text
                )))
            }
            _ => {
                let payload: Value = res
                    .json()
                    .await
                    .map_err(|e| SignerError::Request(e.to_string()))?;
                payload["url"]
                    .as_str()
                    .map(|u| u.to_string())
                    .ok_or_else(|| {
                        SignerError::Request("signing response missing url field".to_string())
                    })
            }
        }
    }
}
