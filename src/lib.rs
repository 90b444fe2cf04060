pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use anyhow::Result;

use crate::app::signing::UrlSigner;
use crate::config::AppConfig;
use crate::infra::images_api::ImagesApi;

#[derive(Clone)]
pub struct AppState {
    pub images: ImagesApi,
    pub signer: UrlSigner,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            images: ImagesApi::new(config)?,
            signer: UrlSigner::new(config.signing_key.as_bytes(), config.signed_url_ttl_seconds),
        })
    }
}
