use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{SignerError, UrlSigner};

// Upstream error bodies longer than this are cut before they reach the logs
const MAX_ERROR_BODY: usize = 512;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignRequest {
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL")]
    signed_url: Option<String>,
}

/// Asks Supabase Storage to sign an object URL with the service-role key.
pub struct SupabaseSigner {
    client: reqwest::Client,
    storage_url: String,
    service_role_key: String,
}

impl SupabaseSigner {
    pub fn new(client: reqwest::Client, project_url: &str, service_role_key: &str) -> Self {
        Self {
            client,
            storage_url: format!("{}/storage/v1", project_url.trim_end_matches('/')),
            service_role_key: service_role_key.to_string(),
        }
    }

    fn sign_endpoint(&self, bucket: &str, key: &str) -> String {
        format!("{}/object/sign/{}/{}", self.storage_url, bucket, key)
    }

    // signedURL comes back relative to the storage API root
    fn absolute(&self, signed: &str) -> String {
        if signed.starts_with("http://") || signed.starts_with("https://") {
            signed.to_string()
        } else {
            format!("{}/{}", self.storage_url, signed.trim_start_matches('/'))
        }
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

#[async_trait]
impl UrlSigner for SupabaseSigner {
    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SignerError> {
        let res = self
            .client
            .post(self.sign_endpoint(bucket, key))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .json(&SignRequest {
                expires_in: expires_in.as_secs(),
            })
            .send()
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SignerError::Upstream {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let body: SignResponse = res
            .json()
            .await
            .map_err(|e| SignerError::Backend(format!("Parse Error: {}", e)))?;

        match body.signed_url.as_deref().map(str::trim) {
            Some(signed) if !signed.is_empty() => Ok(self.absolute(signed)),
            _ => Err(SignerError::EmptyUrl),
        }
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}
