use anyhow::Context;
use axum::async_trait;
use serde_json::{json, Value};
use tracing::error;

use crate::config::ImageHostConfig;

/// Third-party image host: takes an image payload (a data URI or remote URL)
/// and returns the canonical URL it is served from.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, image: &str) -> anyhow::Result<String>;
}

pub struct HttpImageHost {
    client: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
}

impl HttpImageHost {
    pub fn new(config: &ImageHostConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("build image host client")?;
        Ok(Self {
            client,
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ImageHost for HttpImageHost {
    async fn upload(&self, image: &str) -> anyhow::Result<String> {
        let mut request = self
            .client
            .post(&self.upload_url)
            .json(&json!({ "file": image }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.context("image host request")?;
        let status = response.status();
        if !status.is_success() {
            error!(%status, "image host rejected upload");
            anyhow::bail!("image host returned {status}");
        }

        let body: Value = response.json().await.context("image host response body")?;
        secure_url_from_response(&body)
    }
}

fn secure_url_from_response(body: &Value) -> anyhow::Result<String> {
    body.get("secure_url")
        .and_then(Value::as_str)
        .map(str::to_string)
        .context("image host response missing secure_url")
}
