use std::net::Ipv4Addr;

use tracing::info;

use crate::error::Error;
use crate::metadata::MetadataSource;

const PROJECT_ID: &str = "project/project-id";
const INSTANCE_NAME: &str = "instance/name";
const EXTERNAL_IP: &str = "instance/network-interfaces/0/access-configs/0/external-ip";
const DNS_PROJECT: &str = "instance/attributes/dns-project";
const DNS_ZONE: &str = "instance/attributes/dns-zone";
const DNS_TTL: &str = "instance/attributes/dns-ttl";
const DNS_DOMAIN: &str = "instance/attributes/dns-domain";

/// DNS settings taken from the instance's custom metadata attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfig {
    pub project: String,
    pub zone: String,
    pub ttl: u32,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceDescriptor {
    pub project: String,
    pub name: String,
    pub ip: Ipv4Addr,
    pub dns: DnsConfig,
}

impl InstanceDescriptor {
    pub async fn fetch(metadata: &impl MetadataSource) -> Result<Self, Error> {
        let project = fetch_trimmed(metadata, PROJECT_ID).await?;
        let name = fetch_trimmed(metadata, INSTANCE_NAME).await?;
        let ip = fetch_trimmed(metadata, EXTERNAL_IP).await?;
        let dns = DnsConfig {
            project: fetch_trimmed(metadata, DNS_PROJECT).await?,
            zone: fetch_trimmed(metadata, DNS_ZONE).await?,
            ttl: parse_field(DNS_TTL, &fetch_trimmed(metadata, DNS_TTL).await?)?,
            domain: fetch_trimmed(metadata, DNS_DOMAIN).await?,
        };

        let instance = Self {
            project,
            name,
            ip: parse_field(EXTERNAL_IP, &ip)?,
            dns,
        };
        info!(?instance, "Fetched instance details");
        Ok(instance)
    }
}

async fn fetch_trimmed(metadata: &impl MetadataSource, path: &str) -> Result<String, Error> {
    Ok(metadata.fetch(path).await?.trim().to_string())
}

fn parse_field<T: std::str::FromStr>(path: &str, value: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{path}: {value:?}")))
}
