use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

use super::{SignerError, UrlSigner};

/// Presigns `GetObject` requests against an S3-compatible endpoint.
///
/// Signing is local; no request reaches the bucket until the browser
/// follows the URL.
pub struct R2Signer {
    client: Client,
}

impl R2Signer {
    pub fn new(endpoint: &str, access_key_id: &str, secret_access_key: &str) -> Self {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "signed-url-gateway",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("auto"))
            .endpoint_url(endpoint)
            .credentials_provider(credentials)
            // path-style: {endpoint}/{bucket}/{key}
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl UrlSigner for R2Signer {
    async fn create_signed_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, SignerError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        let url = request.uri().to_string();
        if url.is_empty() {
            return Err(SignerError::EmptyUrl);
        }
        Ok(url)
    }

    fn name(&self) -> &'static str {
        "r2"
    }
}
