//! Transport seam between the client and the network
//!
//! The original front end never talked to the network itself: it posted
//! `openUrl` and `pair` messages to a platform bridge and awaited the reply.
//! [`Transport`] keeps that seam as a trait so the client can run over a
//! host-provided bridge, an in-memory fake in tests, or the bundled
//! reqwest-based [`HttpTransport`].

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};

/// Default timeout for control requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("nvhttp/", env!("CARGO_PKG_VERSION"));

/// Messaging bridge used for every host round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `url` and return the response body as text.
    async fn open_url(&self, url: &str) -> Result<String>;

    /// Issue a GET for `url` and return the raw response bytes (box art).
    async fn open_url_binary(&self, url: &str) -> Result<Bytes>;

    /// Run the out-of-band pairing handshake (certificate exchange) with the
    /// host, using the caller-supplied random challenge `pin`.
    async fn pair(&self, server_major_version: u32, address: &str, pin: &str) -> Result<()>;
}

/// Default [`Transport`] backed by reqwest.
///
/// GameStream hosts present a self-signed certificate on the HTTPS control
/// port, so certificate validation is disabled. The body is returned for any
/// HTTP status: error conditions are reported in the XML `status_code`
/// attribute and interpreted by the caller.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout and user agent.
    pub fn new() -> Result<Self> {
        Self::with_config(
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            DEFAULT_USER_AGENT,
        )
    }

    /// Create a transport with an explicit timeout and user agent.
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings.
    /// Note: the client must accept the host's self-signed certificate for
    /// HTTPS endpoints to work.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open_url(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        Ok(response.text().await?)
    }

    async fn open_url_binary(&self, url: &str) -> Result<Bytes> {
        debug!("GET {url} (binary)");
        let response = self.client.get(url).send().await?;
        Ok(response.bytes().await?)
    }

    async fn pair(&self, _server_major_version: u32, _address: &str, _pin: &str) -> Result<()> {
        // The certificate exchange lives in the platform bridge; a plain HTTP
        // transport cannot perform it.
        Err(Error::PairingUnsupported)
    }
}
