use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Parse, serialization or reply validation failure
    #[error(transparent)]
    Proto(#[from] dhcp_proto::Error),

    /// Transport read or write failure
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
