use thiserror::Error;

/// Result type for LEAP operations
pub type Result<T> = std::result::Result<T, LeapError>;

/// Errors that can occur when talking to a LEAP bridge
#[derive(Error, Debug)]
pub enum LeapError {
    /// Socket setup or I/O failure
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// TLS handshake failure
    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    /// No response arrived within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Received bytes did not parse as a single JSON document
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A response was missing fields required to build the device tree
    #[error("discovery error: {0}")]
    Discovery(String),
}
