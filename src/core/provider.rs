use crate::core::record::{ChangeState, RecordChange};
use crate::error::Error;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// A managed zone as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedZone {
    pub name: String,
    pub dns_name: String,
}

/// A DNS provider client bound to a single project.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DNSProvider: Send + Sync {
    /// Look up a managed zone by name, `None` when it does not exist.
    async fn get_zone(&self, zone: &str) -> Result<Option<ManagedZone>, Error>;
    async fn create_change(&self, change: &RecordChange) -> Result<ChangeState, Error>;
    async fn get_change(&self, zone: &str, change_id: &str) -> Result<ChangeState, Error>;
}
