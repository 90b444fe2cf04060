use anyhow::{anyhow, Context, Result};
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::image::{ImageRecord, ListImagesResponse};

/// Client for the hosted image service's account API.
#[derive(Clone)]
pub struct ImagesApi {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl ImagesApi {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.images_api_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let http = builder
            .build()
            .context("failed to build image service http client")?;

        Ok(Self {
            http,
            base_url: config.images_api_base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn list_url(&self) -> String {
        format!("{}/accounts/{}/images/v2", self.base_url, self.account_id)
    }

    /// Fetches the account's image listing in a single request.
    ///
    /// Only the first page the service returns is read; continuation tokens are ignored.
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let url = self.list_url();
        tracing::debug!(url = %url, "requesting image listing");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .context("image listing request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!(
                "image listing request failed with status {}",
                status.as_u16()
            ));
        }

        let body: ListImagesResponse = response
            .json()
            .await
            .context("invalid image listing payload")?;

        if !body.success {
            let details = body
                .errors
                .iter()
                .map(|err| format!("{} ({})", err.message, err.code))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(anyhow!("image listing reported failure: {}", details));
        }

        let result = body
            .result
            .ok_or_else(|| anyhow!("image listing response has no result"))?;

        tracing::debug!(count = result.images.len(), "received image listing");
        Ok(result.images)
    }
}
