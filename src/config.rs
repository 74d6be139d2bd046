use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const DEFAULT_DNS_API_URL: &str = "https://dns.googleapis.com/dns/v1";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

/// Where and how to reach the instance metadata service.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub base_url: String,
    pub flavor: String,
}

/// Change-set polling behaviour.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    pub poll_interval: Duration,
    /// `None` keeps polling until the change is done.
    pub max_poll_attempts: Option<u32>,
    /// When false, create/reload failures come back as `SubmitOutcome::Failed`
    /// instead of an error, so a startup hook does not crash-loop.
    pub propagate_submission_errors: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub metadata: MetadataConfig,
    pub dns_api_url: String,
    pub submit: SubmitConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host =
            lookup("GCE_METADATA_HOST").unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());
        let base_url = lookup("METADATA_URL")
            .unwrap_or_else(|| format!("http://{host}/computeMetadata/v1"));

        let poll_secs =
            parse_var(&lookup, "POLL_INTERVAL_SECS")?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Ok(Config {
            metadata: MetadataConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                flavor: String::from("Google"),
            },
            dns_api_url: lookup("CLOUD_DNS_API_URL")
                .unwrap_or_else(|| DEFAULT_DNS_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            submit: SubmitConfig {
                poll_interval: Duration::from_secs(poll_secs),
                max_poll_attempts: parse_var(&lookup, "MAX_POLL_ATTEMPTS")?,
                propagate_submission_errors: parse_var(&lookup, "PROPAGATE_SUBMISSION_ERRORS")?
                    .unwrap_or(true),
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidInput(format!("{key}={raw}"))),
    }
}

pub(crate) mod mock {
    use super::*;

    impl Default for SubmitConfig {
        fn default() -> Self {
            SubmitConfig {
                poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
                max_poll_attempts: None,
                propagate_submission_errors: true,
            }
        }
    }
}
