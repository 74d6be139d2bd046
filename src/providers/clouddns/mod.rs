//! Google Cloud DNS v1 provider implementation

pub mod client;
pub mod error;
pub mod types;

pub use client::{CloudDnsConfig, CloudDnsProvider};
pub use error::CloudDnsProviderError;

// --- DNSProvider trait implementation for CloudDnsProvider ---
use crate::core::provider::{DNSProvider, ManagedZone};
use crate::core::record::{ChangeState, RecordChange};
use crate::error::Error;
use async_trait::async_trait;
use error::map_error;
use types::{to_change_request, to_change_state, to_managed_zone};

#[async_trait]
impl DNSProvider for CloudDnsProvider {
    async fn get_zone(&self, zone: &str) -> Result<Option<ManagedZone>, Error> {
        match self.get_managed_zone(zone).await {
            Ok(res) => Ok(Some(to_managed_zone(res))),
            Err(CloudDnsProviderError::NotFound(_)) => Ok(None),
            Err(e) => Err(map_error(e)),
        }
    }

    async fn create_change(&self, change: &RecordChange) -> Result<ChangeState, Error> {
        let req = to_change_request(change);
        self.post_change(&change.zone.name, &req)
            .await
            .map(|res| to_change_state(&res))
            .map_err(map_error)
    }

    async fn get_change(&self, zone: &str, change_id: &str) -> Result<ChangeState, Error> {
        self.fetch_change(zone, change_id)
            .await
            .map(|res| to_change_state(&res))
            .map_err(map_error)
    }
}
