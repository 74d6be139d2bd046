//! Client for the instance metadata service.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::MetadataConfig;
use crate::error::Error;

#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch a metadata value as plain text.
    async fn fetch(&self, path: &str) -> Result<String, Error>;
}

pub struct MetadataClient {
    config: MetadataConfig,
    client: Client,
}

impl MetadataClient {
    pub fn new(config: MetadataConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(client_error)?;
        Ok(Self { config, client })
    }

    async fn get(&self, path: &str, alt: &str) -> Result<reqwest::Response, Error> {
        let url = format!("{}/{}", self.config.base_url, path);
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .query(&[("alt", alt)])
            .header("Metadata-Flavor", &self.config.flavor)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| metadata_error(path, e))?;
        Ok(response)
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.get(path, "json")
            .await?
            .json()
            .await
            .map_err(|e| metadata_error(path, e))
    }
}

fn client_error(e: reqwest::Error) -> Error {
    Error::Client(format!("metadata client: {e}"))
}

fn metadata_error(path: &str, e: reqwest::Error) -> Error {
    error!("Error occurred while accessing metadata {}: {}", path, e);
    Error::Metadata {
        path: path.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn fetch(&self, path: &str) -> Result<String, Error> {
        self.get(path, "text")
            .await?
            .text()
            .await
            .map_err(|e| metadata_error(path, e))
    }
}
