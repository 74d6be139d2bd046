use tracing::{info, warn};

use crate::core::provider::DNSProvider;
use crate::error::Error;

/// Handle to a managed zone that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub project: String,
    pub name: String,
    pub dns_name: String,
}

fn same_domain(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}

/// Resolve `zone_name` in `project`. `provider` must be bound to `project`.
pub async fn locate_zone(
    provider: &dyn DNSProvider,
    project: &str,
    zone_name: &str,
    domain: &str,
) -> Result<Zone, Error> {
    let Some(managed) = provider.get_zone(zone_name).await? else {
        warn!("Zone {} does not exist.", zone_name);
        return Err(Error::ZoneNotFound(zone_name.to_string()));
    };
    info!("Zone {} exists.", zone_name);

    if !same_domain(&managed.dns_name, domain) {
        warn!(
            "Zone {} serves {} but instance domain is {}",
            zone_name, managed.dns_name, domain
        );
    }

    Ok(Zone {
        project: project.to_string(),
        name: managed.name,
        dns_name: managed.dns_name,
    })
}
