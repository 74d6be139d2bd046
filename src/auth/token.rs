use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::Error;
use crate::metadata::MetadataClient;

const DEFAULT_TOKEN_PATH: &str = "instance/service-accounts/default/token";
/// Refresh this long before the metadata server says the token expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, Error>;
}

#[derive(Deserialize, Debug)]
struct AccessToken {
    access_token: String,
    expires_in: Option<u64>,
    #[allow(dead_code)]
    token_type: Option<String>,
}

/// Access tokens for the instance's default service account, served by the
/// metadata service.
pub struct MetadataTokenSource {
    metadata: Arc<MetadataClient>,
    cached: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

impl MetadataTokenSource {
    pub fn new(metadata: Arc<MetadataClient>) -> Self {
        Self {
            metadata,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TokenSource for MetadataTokenSource {
    async fn access_token(&self) -> Result<String, Error> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.value.clone());
        }

        let token: AccessToken = self
            .metadata
            .fetch_json(DEFAULT_TOKEN_PATH)
            .await
            .map_err(|e| Error::CredentialError(e.to_string()))?;

        // Tokens without a usable lifetime are not kept
        let lifetime =
            Duration::from_secs(token.expires_in.unwrap_or(0)).saturating_sub(EXPIRY_MARGIN);
        *cached = (!lifetime.is_zero()).then(|| CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataConfig;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;

    fn token_source(server: &MockServer) -> MetadataTokenSource {
        let metadata = MetadataClient::new(MetadataConfig {
            base_url: server.url("/computeMetadata/v1"),
            flavor: String::from("Google"),
        })
        .unwrap();
        MetadataTokenSource::new(Arc::new(metadata))
    }

    #[tokio::test]
    async fn test_access_token_from_metadata() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/computeMetadata/v1/instance/service-accounts/default/token")
                    .header("Metadata-Flavor", "Google");
                then.status(200).json_body_obj(&serde_json::json!({
                    "access_token": "ya29.token",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }));
            })
            .await;

        let token = token_source(&server).access_token().await.unwrap();
        assert_eq!(token, "ya29.token");
        token_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_reused_until_expiry() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/computeMetadata/v1/instance/service-accounts/default/token");
                then.status(200).json_body_obj(&serde_json::json!({
                    "access_token": "ya29.token",
                    "expires_in": 3599,
                    "token_type": "Bearer"
                }));
            })
            .await;

        let tokens = token_source(&server);
        for _ in 0..3 {
            assert_eq!(tokens.access_token().await.unwrap(), "ya29.token");
        }
        token_mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refetched() {
        let server = MockServer::start_async().await;
        let token_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/computeMetadata/v1/instance/service-accounts/default/token");
                then.status(200).json_body_obj(&serde_json::json!({
                    "access_token": "ya29.token",
                    "expires_in": 30
                }));
            })
            .await;

        let tokens = token_source(&server);
        tokens.access_token().await.unwrap();
        tokens.access_token().await.unwrap();
        token_mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_missing_service_account() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/computeMetadata/v1/instance/service-accounts/default/token");
                then.status(404);
            })
            .await;

        let result = token_source(&server).access_token().await;
        assert_matches!(result, Err(Error::CredentialError(_)));
    }
}
