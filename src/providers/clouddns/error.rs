use crate::providers::clouddns::types::CloudDnsError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudDnsProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<CloudDnsError> for CloudDnsProviderError {
    fn from(err: CloudDnsError) -> Self {
        match StatusCode::from_u16(err.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR) {
            StatusCode::NOT_FOUND => CloudDnsProviderError::NotFound(err.message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CloudDnsProviderError::Credential(err.message)
            }
            // 412 is what a delete with a stale ttl or value gets back
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                CloudDnsProviderError::InvalidInput(err.message)
            }
            _ => CloudDnsProviderError::Provider(err.message),
        }
    }
}

use crate::error::Error;

pub fn map_error(e: CloudDnsProviderError) -> Error {
    use CloudDnsProviderError::*;
    match e {
        Http(err) => Error::ProviderError(err.to_string()),
        Credential(msg) => Error::CredentialError(msg),
        NotFound(msg) => Error::NotFound(msg),
        InvalidInput(msg) => Error::InvalidInput(msg),
        Provider(msg) => Error::ProviderError(msg),
    }
}
