//! Storage providers able to mint time-limited read URLs.

mod r2;
mod supabase;

pub use r2::R2Signer;
pub use supabase::SupabaseSigner;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Args, Provider, non_empty};

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("provider returned no URL")]
    EmptyUrl,
}

/// Capability consumed by the signed-URL handler.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SignerError>;

    fn name(&self) -> &'static str;
}

fn presence(value: &Option<String>) -> &'static str {
    if non_empty(value).is_some() { "set" } else { "MISSING" }
}

/// Builds the configured provider, or `None` if any of its settings is absent.
///
/// Missing settings are logged by name only; values never reach the logs.
pub fn from_args(args: &Args) -> Option<Arc<dyn UrlSigner>> {
    match args.provider {
        Provider::R2 => {
            let endpoint = non_empty(&args.r2_endpoint);
            let access_key_id = non_empty(&args.r2_access_key_id);
            let secret_access_key = non_empty(&args.r2_secret_access_key);
            match (endpoint, access_key_id, secret_access_key) {
                (Some(endpoint), Some(key_id), Some(secret)) => {
                    Some(Arc::new(R2Signer::new(&endpoint, &key_id, &secret)))
                }
                _ => {
                    tracing::error!(
                        R2_ENDPOINT = presence(&args.r2_endpoint),
                        R2_ACCESS_KEY_ID = presence(&args.r2_access_key_id),
                        R2_SECRET_ACCESS_KEY = presence(&args.r2_secret_access_key),
                        "missing R2 configuration; signed URLs disabled"
                    );
                    None
                }
            }
        }
        Provider::Supabase => {
            let url = non_empty(&args.supabase_url);
            let key = non_empty(&args.supabase_service_role_key);
            match (url, key) {
                (Some(url), Some(key)) => Some(Arc::new(SupabaseSigner::new(
                    reqwest::Client::new(),
                    &url,
                    &key,
                ))),
                _ => {
                    tracing::error!(
                        SUPABASE_URL = presence(&args.supabase_url),
                        SUPABASE_SERVICE_ROLE_KEY = presence(&args.supabase_service_role_key),
                        "missing Supabase configuration; signed URLs disabled"
                    );
                    None
                }
            }
        }
    }
}
