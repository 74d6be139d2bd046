use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::auth::token::TokenSource;
use crate::providers::clouddns::error::CloudDnsProviderError;
use crate::providers::clouddns::types::*;

pub struct CloudDnsConfig {
    pub project: String,
    pub api_url: String,
}

pub struct CloudDnsProvider {
    config: CloudDnsConfig,
    client: Client,
    tokens: Arc<dyn TokenSource>,
}

impl CloudDnsProvider {
    pub fn new(
        config: CloudDnsConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, CloudDnsProviderError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    fn zone_url(&self, zone: &str) -> String {
        format!(
            "{}/projects/{}/managedZones/{}",
            self.config.api_url, self.config.project, zone
        )
    }

    async fn handle_request<T>(&self, request: RequestBuilder) -> Result<T, CloudDnsProviderError>
    where
        T: serde::de::DeserializeOwned,
    {
        let token = self
            .tokens
            .access_token()
            .await
            .map_err(|e| CloudDnsProviderError::Credential(e.to_string()))?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error = match response.json::<CloudDnsErrorEnvelope>().await {
            Ok(envelope) => envelope.error,
            Err(_) => CloudDnsError {
                code: status.as_u16(),
                message: status.to_string(),
            },
        };
        Err(error.into())
    }

    pub async fn get_managed_zone(
        &self,
        zone: &str,
    ) -> Result<ManagedZoneResource, CloudDnsProviderError> {
        let url = self.zone_url(zone);
        debug!("GET {}", url);
        self.handle_request(self.client.get(url)).await
    }

    pub async fn post_change(
        &self,
        zone: &str,
        req: &ChangeRequest,
    ) -> Result<ChangeResource, CloudDnsProviderError> {
        let url = format!("{}/changes", self.zone_url(zone));
        debug!("POST {}", url);
        self.handle_request(self.client.post(url).json(req)).await
    }

    pub async fn fetch_change(
        &self,
        zone: &str,
        change_id: &str,
    ) -> Result<ChangeResource, CloudDnsProviderError> {
        let url = format!("{}/changes/{}", self.zone_url(zone), change_id);
        debug!("GET {}", url);
        self.handle_request(self.client.get(url)).await
    }
}
