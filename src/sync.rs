//! The startup/shutdown procedure: read metadata, find the zone, submit one
//! record change.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::auth::token::MetadataTokenSource;
use crate::config::{Config, SubmitConfig};
use crate::core::provider::DNSProvider;
use crate::core::record::{build_add, build_delete};
use crate::core::zone::locate_zone;
use crate::error::Error;
use crate::instance::InstanceDescriptor;
use crate::metadata::{MetadataClient, MetadataSource};
use crate::providers::clouddns::error::map_error;
use crate::providers::clouddns::{CloudDnsConfig, CloudDnsProvider};
use crate::submitter::{ChangeSubmitter, SubmitOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add the instance's A record.
    Startup,
    /// Delete the instance's A record.
    Shutdown,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startup" => Ok(Command::Startup),
            "shutdown" => Ok(Command::Shutdown),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

/// Run `command` against the zone described by the instance metadata.
/// `connect` opens a provider bound to the DNS project.
pub async fn update_dns<F>(
    command: &str,
    metadata: &impl MetadataSource,
    connect: F,
    submit_config: SubmitConfig,
) -> Result<SubmitOutcome, Error>
where
    F: FnOnce(&str) -> Result<Box<dyn DNSProvider>, Error>,
{
    let command: Command = command.parse()?;

    let instance = InstanceDescriptor::fetch(metadata).await?;
    let dns = &instance.dns;
    info!(
        "Updating DNS for instance {} of project {}",
        instance.name, instance.project
    );
    let provider = connect(&dns.project)?;
    let zone = locate_zone(provider.as_ref(), &dns.project, &dns.zone, &dns.domain).await?;

    let change = match command {
        Command::Startup => build_add(&zone, &instance.name, &dns.domain, dns.ttl, instance.ip),
        Command::Shutdown => build_delete(&zone, &instance.name, &dns.domain, dns.ttl, instance.ip),
    };
    info!(
        "Submitting {:?} of {} A {} {:?} in zone {} ({})",
        change.kind,
        change.record_set.name,
        change.record_set.ttl,
        change.record_set.rrdatas,
        zone.name,
        zone.dns_name
    );

    ChangeSubmitter::new(provider.as_ref(), submit_config)
        .submit(&change)
        .await
}

/// Wire the metadata service and Cloud DNS together from `config`.
pub async fn run(command: &str, config: &Config) -> Result<SubmitOutcome, Error> {
    let metadata = Arc::new(MetadataClient::new(config.metadata.clone())?);
    let tokens = Arc::new(MetadataTokenSource::new(metadata.clone()));
    let api_url = config.dns_api_url.clone();

    let connect = move |project: &str| -> Result<Box<dyn DNSProvider>, Error> {
        let provider = CloudDnsProvider::new(
            CloudDnsConfig {
                project: project.to_string(),
                api_url,
            },
            tokens,
        )
        .map_err(map_error)?;
        Ok(Box::new(provider))
    };

    update_dns(command, &*metadata, connect, config.submit.clone()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetadataConfig;
    use crate::core::provider::{ManagedZone, MockDNSProvider};
    use crate::core::record::{ChangeKind, ChangeState, ChangeStatus, DNSRecordType};
    use crate::instance::tests::sample_metadata;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn provider_expecting(kind: ChangeKind) -> MockDNSProvider {
        let mut provider = MockDNSProvider::new();
        provider
            .expect_get_zone()
            .withf(|zone| zone == "myzone")
            .returning(|_| {
                Ok(Some(ManagedZone {
                    name: "myzone".into(),
                    dns_name: "example.com.".into(),
                }))
            });
        provider
            .expect_create_change()
            .withf(move |change| {
                change.kind == kind
                    && change.zone.project == "proj1"
                    && change.zone.name == "myzone"
                    && change.record_set.name == "vm1.example.com."
                    && change.record_set.record_type == DNSRecordType::A
                    && change.record_set.ttl == 300
                    && change.record_set.rrdatas == vec!["1.2.3.4".to_string()]
            })
            .times(1)
            .returning(|_| {
                Ok(ChangeState {
                    id: "1".into(),
                    status: ChangeStatus::Pending,
                })
            });
        provider
            .expect_get_change()
            .times(1)
            .returning(|_, id| {
                Ok(ChangeState {
                    id: id.to_string(),
                    status: ChangeStatus::Done,
                })
            });
        provider
    }

    fn fast_submit() -> SubmitConfig {
        SubmitConfig {
            poll_interval: Duration::from_millis(10),
            ..SubmitConfig::default()
        }
    }

    #[test]
    fn test_parse_command() {
        assert_eq!("startup".parse::<Command>().unwrap(), Command::Startup);
        assert_eq!("shutdown".parse::<Command>().unwrap(), Command::Shutdown);
        assert_matches!("reboot".parse::<Command>(), Err(Error::UnknownCommand(cmd)) if cmd == "reboot");
        assert_matches!("Startup".parse::<Command>(), Err(Error::UnknownCommand(_)));
    }

    #[tokio::test]
    async fn test_startup_adds_record() {
        let metadata = sample_metadata();
        let outcome = update_dns(
            "startup",
            &metadata,
            |project| {
                assert_eq!(project, "proj1");
                Ok(Box::new(provider_expecting(ChangeKind::Add)))
            },
            fast_submit(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SubmitOutcome::Done { change_id: "1".into() });
    }

    #[tokio::test]
    async fn test_shutdown_deletes_record() {
        let metadata = sample_metadata();
        let outcome = update_dns(
            "shutdown",
            &metadata,
            |_| Ok(Box::new(provider_expecting(ChangeKind::Delete))),
            fast_submit(),
        )
        .await
        .unwrap();
        assert_eq!(outcome, SubmitOutcome::Done { change_id: "1".into() });
    }

    #[tokio::test]
    async fn test_unknown_command_does_nothing() {
        let metadata = sample_metadata();
        let result = update_dns(
            "restart",
            &metadata,
            |_| panic!("no provider should be opened"),
            fast_submit(),
        )
        .await;
        assert_matches!(result, Err(Error::UnknownCommand(_)));
        assert!(metadata.requested().is_empty());
    }

    #[tokio::test]
    async fn test_missing_zone_submits_nothing() {
        let metadata = sample_metadata();
        let result = update_dns(
            "startup",
            &metadata,
            |_| {
                let mut provider = MockDNSProvider::new();
                provider.expect_get_zone().returning(|_| Ok(None));
                provider.expect_create_change().never();
                provider.expect_get_change().never();
                Ok(Box::new(provider))
            },
            fast_submit(),
        )
        .await;
        assert_matches!(result, Err(Error::ZoneNotFound(zone)) if zone == "myzone");
    }

    struct Servers {
        metadata: MockServer,
        dns: MockServer,
    }

    async fn servers() -> Servers {
        let metadata = MockServer::start_async().await;
        for (path, value) in [
            ("project/project-id", "host-project"),
            ("instance/name", "vm1"),
            ("instance/network-interfaces/0/access-configs/0/external-ip", "1.2.3.4"),
            ("instance/attributes/dns-project", "proj1"),
            ("instance/attributes/dns-zone", "myzone"),
            ("instance/attributes/dns-ttl", "300"),
            ("instance/attributes/dns-domain", "example.com"),
        ] {
            metadata
                .mock_async(|when, then| {
                    when.method(GET)
                        .path(format!("/computeMetadata/v1/{path}"))
                        .header("Metadata-Flavor", "Google")
                        .query_param("alt", "text");
                    then.status(200).body(value);
                })
                .await;
        }
        metadata
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

        let dns = MockServer::start_async().await;
        dns.mock_async(|when, then| {
            when.method(GET)
                .path("/dns/v1/projects/proj1/managedZones/myzone")
                .header("Authorization", "Bearer ya29.token");
            then.status(200).json_body_obj(&serde_json::json!({
                "name": "myzone",
                "dnsName": "example.com."
            }));
        })
        .await;
        dns.mock_async(|when, then| {
            when.method(GET)
                .path("/dns/v1/projects/proj1/managedZones/myzone/changes/42");
            then.status(200)
                .json_body_obj(&serde_json::json!({ "id": "42", "status": "done" }));
        })
        .await;

        Servers { metadata, dns }
    }

    fn config_for(servers: &Servers) -> Config {
        Config {
            metadata: MetadataConfig {
                base_url: servers.metadata.url("/computeMetadata/v1"),
                flavor: String::from("Google"),
            },
            dns_api_url: servers.dns.url("/dns/v1"),
            submit: fast_submit(),
        }
    }

    fn expected_record_set() -> serde_json::Value {
        serde_json::json!([{
            "name": "vm1.example.com.",
            "type": "A",
            "ttl": 300,
            "rrdatas": ["1.2.3.4"]
        }])
    }

    #[tokio::test]
    async fn test_run_startup_end_to_end() {
        let servers = servers().await;
        let create_mock = servers
            .dns
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/dns/v1/projects/proj1/managedZones/myzone/changes")
                    .json_body(serde_json::json!({ "additions": expected_record_set() }));
                then.status(200)
                    .json_body_obj(&serde_json::json!({ "id": "42", "status": "pending" }));
            })
            .await;

        let outcome = run("startup", &config_for(&servers)).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Done { change_id: "42".into() });
        create_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_run_shutdown_end_to_end() {
        let servers = servers().await;
        let delete_mock = servers
            .dns
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/dns/v1/projects/proj1/managedZones/myzone/changes")
                    .json_body(serde_json::json!({ "deletions": expected_record_set() }));
                then.status(200)
                    .json_body_obj(&serde_json::json!({ "id": "42", "status": "pending" }));
            })
            .await;

        let outcome = run("shutdown", &config_for(&servers)).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Done { change_id: "42".into() });
        delete_mock.assert_async().await;
    }
}
