use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that abort building a configuration
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("A listener for another TCP service is already configured on {ip}:{port}")]
    DuplicateTcpListener { ip: String, port: u16 },

    #[error("Listener source error: {0}")]
    Source(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),
}

/// Reasons a single listener request is rejected. The store is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid mode ({0}) specified - valid options 'http', 'tcp'")]
    InvalidMode(String),

    #[error("Mode does not match on service")]
    ModeMismatch,

    #[error("SSL Certificate provided on a service that isn't using SSL")]
    SslCertificateUnexpected,

    #[error("No SSL Certificate provided on a service that is using SSL")]
    SslCertificateMissing,
}
