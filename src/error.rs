use thiserror::Error;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Metadata error at {path}: {message}")]
    Metadata { path: String, message: String },

    #[error("Zone {0} does not exist")]
    ZoneNotFound(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Change {change_id} not done after {attempts} status checks")]
    Timeout { change_id: String, attempts: u32 },
}
