use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_IMAGES_API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub account_id: String,
    pub api_token: String,
    pub images_api_base_url: String,
    pub images_api_timeout_seconds: Option<u64>,
    pub signing_key: String,
    pub signed_url_ttl_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        let signing_key = env_or_err("CLOUDFLARE_IMAGES_PRIVATE_KEY")?;
        if signing_key.is_empty() {
            return Err(anyhow!("invalid CLOUDFLARE_IMAGES_PRIVATE_KEY: must not be empty"));
        }

        Ok(Self {
            http_addr,
            account_id: env_or_err("CLOUDFLARE_ACCOUNT_ID")?,
            api_token: env_or_err("CLOUDFLARE_API_TOKEN")?,
            images_api_base_url: env_or("IMAGES_API_BASE_URL", DEFAULT_IMAGES_API_BASE_URL),
            images_api_timeout_seconds: env_opt_parse("IMAGES_API_TIMEOUT_SECONDS")?,
            signing_key,
            signed_url_ttl_seconds: env_or_parse("SIGNED_URL_TTL_SECONDS", "604800")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

fn env_opt_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow!("invalid {}: {}", key, err)),
        Err(_) => Ok(None),
    }
}
