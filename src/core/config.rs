use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {value}")]
    InvalidVar { var: &'static str, value: String },
}

/// Runtime settings, read once at startup and threaded through `AppState`.
///
/// The knowledge-base id, model id, region and API token are required; the
/// collaborator endpoints default to the region-derived hosts and can be
/// overridden individually.
#[derive(Debug, Clone)]
pub struct Settings {
    pub knowledge_base_id: String,
    pub model_id: String,
    pub region: String,
    pub api_token: String,
    pub retriever_endpoint: String,
    pub runtime_endpoint: String,
    pub signer_endpoint: String,
    pub top_k: usize,
    pub link_expiry_secs: u64,
    pub log_dir: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| -> Result<String, ConfigError> {
            lookup(var)
                .filter(|val| !val.trim().is_empty())
                .ok_or(ConfigError::MissingVar(var))
        };

        let knowledge_base_id = required("KBCHAT_KNOWLEDGE_BASE_ID")?;
        let model_id = required("KBCHAT_MODEL_ID")?;
        let region = required("KBCHAT_REGION")?;
        let api_token = required("KBCHAT_API_TOKEN")?;

        let retriever_endpoint = lookup("KBCHAT_RETRIEVER_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-agent-runtime.{}.amazonaws.com", region));
        let runtime_endpoint = lookup("KBCHAT_RUNTIME_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", region));
        let signer_endpoint = lookup("KBCHAT_SIGNER_ENDPOINT")
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));

        let top_k = parse_var(&lookup, "KBCHAT_TOP_K", 4usize)?;
        let link_expiry_secs = parse_var(
            &lookup,
            "KBCHAT_LINK_EXPIRY_SECS",
            crate::storage::DEFAULT_LINK_EXPIRY_SECS,
        )?;

        Ok(Settings {
            knowledge_base_id,
            model_id,
            region,
            api_token,
            retriever_endpoint: retriever_endpoint.trim_end_matches('/').to_string(),
            runtime_endpoint: runtime_endpoint.trim_end_matches('/').to_string(),
            signer_endpoint: signer_endpoint.trim_end_matches('/').to_string(),
            top_k,
            link_expiry_secs,
            log_dir: lookup("KBCHAT_LOG_DIR").filter(|val| !val.trim().is_empty()),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidVar { var, value: raw }),
        None => Ok(default),
    }
}
