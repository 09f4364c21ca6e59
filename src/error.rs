//! Error types for the GameStream host client

/// Result type alias for host client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a GameStream host
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// XML deserialization failed
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The host answered with a non-200 status_code attribute
    #[error("Host returned status code {0}")]
    ServerStatus(u16),

    /// A required element was absent from the response document
    #[error("Missing required response element: {0}")]
    MissingField(&'static str),

    /// A response element held a value that could not be interpreted
    #[error("Invalid {0} value: {1}")]
    InvalidField(&'static str, String),

    /// The transport in use has no out-of-band pairing bridge
    #[error("Transport does not support the pairing handshake")]
    PairingUnsupported,

    /// Failure reported by a custom transport
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Create a transport error from a message
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
