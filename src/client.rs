//! HTTP/XML client for a GameStream host's control API

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::models::{App, ServerInfo};
use crate::transport::{
    HttpTransport, Transport, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::{models, uid};

/// HTTPS control port of a GameStream host
pub const DEFAULT_HTTPS_PORT: u16 = 47984;

/// Plaintext HTTP control port of a GameStream host
pub const DEFAULT_HTTP_PORT: u16 = 47989;

/// Device name sent during the pairing handshake
pub const DEFAULT_DEVICE_NAME: &str = "roth";

/// Fixed challenge phrase of the documented pairing handshake
const PAIR_CHALLENGE_PHRASE: &str = "pairchallenge";

/// Stream configuration passed to [`NvHttpClient::launch_app`].
///
/// `rikey`/`rikeyid` are the remote input encryption key and its id, shared
/// with the streaming connection that follows the launch.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Display mode, `WIDTHxHEIGHTxFPS` (e.g. `1920x1080x60`)
    pub mode: String,
    /// Whether the host may adjust game settings for streaming (SOPS)
    pub sops: bool,
    /// Remote input encryption key (hex)
    pub rikey: String,
    /// Remote input encryption key id
    pub rikeyid: u32,
    /// Play audio on the host instead of the client
    pub local_audio: bool,
    /// Packed surround channel layout (0x30002 = stereo)
    pub surround_audio_info: u32,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            mode: "1920x1080x60".to_string(),
            sops: true,
            rikey: String::new(),
            rikeyid: 0,
            local_audio: false,
            surround_audio_info: 0x30002,
        }
    }
}

/// GameStream host control client
///
/// One client per target host. All operations are single HTTP round trips
/// issued through the configured [`Transport`]; the only state kept between
/// calls is the pairing flag, the current-game id and the application-list
/// cache.
///
/// # Example
///
/// ```no_run
/// use nvhttp::NvHttpClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut client = NvHttpClient::new("192.168.1.100")?;
///     client.refresh_server_info().await?;
///     println!("paired: {}", client.paired());
///     for app in client.app_list().await? {
///         println!("{} (id {})", app.title, app.id);
///     }
///     Ok(())
/// }
/// ```
pub struct NvHttpClient {
    transport: Arc<dyn Transport>,
    address: String,
    base_url_https: String,
    base_url_http: String,
    unique_id: String,
    device_name: String,
    paired: bool,
    current_game: u32,
    server_major_version: u32,
    server_state: String,
    app_list_cache: Option<Vec<App>>,
}

impl NvHttpClient {
    /// Create a client for `address` with default settings.
    pub fn new(address: impl Into<String>) -> Result<Self> {
        Self::builder(address).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(address: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(address)
    }

    /// Target host address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Opaque client identifier sent as `uniqueid` on every request.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Pairing status from the last `/serverinfo` refresh.
    pub fn paired(&self) -> bool {
        self.paired
    }

    /// Id of the application currently being streamed, 0 when none.
    pub fn current_game(&self) -> u32 {
        self.current_game
    }

    /// Major protocol version from the last `/serverinfo` refresh.
    pub fn server_major_version(&self) -> u32 {
        self.server_major_version
    }

    /// Raw server state from the last `/serverinfo` refresh.
    pub fn server_state(&self) -> &str {
        &self.server_state
    }

    /// Refresh pairing status, current game, protocol version and server
    /// state from `/serverinfo`.
    ///
    /// Tries the HTTPS endpoint first and falls back once to plaintext HTTP
    /// when the HTTPS response is missing or not a status-200 document (the
    /// HTTPS port rejects unpaired clients).
    pub async fn refresh_server_info(&mut self) -> Result<()> {
        let url = self.endpoint_url(&self.base_url_https, "serverinfo", &[])?;
        let info = match self.fetch_server_info(&url).await {
            Ok(info) => info,
            Err(err) => {
                debug!("HTTPS serverinfo failed ({err}), retrying over plain HTTP");
                let url = self.endpoint_url(&self.base_url_http, "serverinfo", &[])?;
                self.fetch_server_info(&url).await?
            }
        };

        self.paired = info.paired;
        self.current_game = info.current_game;
        self.server_major_version = info.server_major_version;
        self.server_state = info.state;
        Ok(())
    }

    async fn fetch_server_info(&self, url: &str) -> Result<ServerInfo> {
        let body = self.transport.open_url(url).await?;
        ServerInfo::from_xml(&body)
    }

    /// Fetch the host's application directory.
    ///
    /// The list is cached for the lifetime of the client; subsequent calls
    /// return the cached copy without issuing a request.
    pub async fn app_list(&mut self) -> Result<Vec<App>> {
        if let Some(cached) = &self.app_list_cache {
            debug!("returning app list from cache");
            return Ok(cached.clone());
        }

        let url = self.endpoint_url(&self.base_url_https, "applist", &[])?;
        let body = self.transport.open_url(&url).await?;
        let apps = models::parse_app_list(&body)?;
        self.app_list_cache = Some(apps.clone());
        Ok(apps)
    }

    /// Find an application by id; `None` when the id is unknown.
    pub async fn app_by_id(&mut self, app_id: u32) -> Result<Option<App>> {
        let apps = self.app_list().await?;
        Ok(apps.into_iter().find(|app| app.id == app_id))
    }

    /// Find an application by title; `None` when the title is unknown.
    pub async fn app_by_name(&mut self, name: &str) -> Result<Option<App>> {
        let apps = self.app_list().await?;
        Ok(apps.into_iter().find(|app| app.title == name))
    }

    /// Launch an application on the host.
    ///
    /// Success means the request completed; the response body is not
    /// interpreted.
    pub async fn launch_app(&self, app_id: u32, options: &LaunchOptions) -> Result<()> {
        let url = self.endpoint_url(
            &self.base_url_https,
            "launch",
            &[
                ("appid", &app_id.to_string()),
                ("mode", &options.mode),
                ("additionalStates", "1"),
                ("sops", flag(options.sops)),
                ("rikey", &options.rikey),
                ("rikeyid", &options.rikeyid.to_string()),
                ("localAudioPlayMode", flag(options.local_audio)),
                ("surroundAudioInfo", &options.surround_audio_info.to_string()),
            ],
        )?;
        self.transport.open_url(&url).await?;
        Ok(())
    }

    /// Resume the streaming session of an already-running application.
    pub async fn resume_app(&self, rikey: &str, rikeyid: u32) -> Result<()> {
        let url = self.endpoint_url(
            &self.base_url_https,
            "resume",
            &[("rikey", rikey), ("rikeyid", &rikeyid.to_string())],
        )?;
        self.transport.open_url(&url).await?;
        Ok(())
    }

    /// Quit the active streaming session and reset the current game to 0.
    pub async fn quit_app(&mut self) -> Result<()> {
        let url = self.endpoint_url(&self.base_url_https, "cancel", &[])?;
        self.transport.open_url(&url).await?;
        self.current_game = 0;
        Ok(())
    }

    /// Fetch the box-art image bytes for an application.
    pub async fn box_art(&self, app_id: u32) -> Result<Bytes> {
        let url = self.endpoint_url(
            &self.base_url_https,
            "appasset",
            &[
                ("appid", &app_id.to_string()),
                ("AssetType", "2"),
                ("AssetIdx", "0"),
            ],
        )?;
        self.transport.open_url_binary(&url).await
    }

    /// Pair with the host using a caller-supplied random challenge.
    ///
    /// Refreshes server info first: returns `Ok(true)` immediately when
    /// already paired, and `Ok(false)` without contacting any pairing
    /// endpoint when a streaming session is active. Otherwise runs the
    /// transport's out-of-band handshake followed by the HTTPS `/pair`
    /// challenge request, and reports the resulting pairing status.
    pub async fn pair(&mut self, pin: &str) -> Result<bool> {
        self.refresh_server_info().await?;

        if self.paired {
            return Ok(true);
        }
        if self.current_game != 0 {
            warn!(
                "cannot pair while a session is active (current game {})",
                self.current_game
            );
            return Ok(false);
        }

        self.transport
            .pair(self.server_major_version, &self.address, pin)
            .await?;

        // The challenge request carries no per-request uuid token.
        let mut url = Url::parse(&format!("{}/pair", self.base_url_https))?;
        url.query_pairs_mut()
            .append_pair("uniqueid", &self.unique_id)
            .append_pair("devicename", &self.device_name)
            .append_pair("updateState", "1")
            .append_pair("phrase", PAIR_CHALLENGE_PHRASE);

        let body = self.transport.open_url(url.as_str()).await?;
        self.paired = models::parse_pair_response(&body)?;
        Ok(self.paired)
    }

    /// Remove this client's pairing from the host.
    pub async fn unpair(&mut self) -> Result<()> {
        let url = self.endpoint_url(&self.base_url_https, "unpair", &[])?;
        self.transport.open_url(&url).await?;
        self.paired = false;
        Ok(())
    }

    /// Build an endpoint URL carrying `uniqueid`, a fresh `uuid` token and
    /// any operation-specific parameters.
    fn endpoint_url(&self, base: &str, path: &str, extra: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&format!("{base}/{path}"))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("uniqueid", &self.unique_id);
            pairs.append_pair("uuid", &uid::generate_uuid());
            for (name, value) in extra {
                pairs.append_pair(name, value);
            }
        }
        Ok(url.into())
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Builder for configuring an [`NvHttpClient`]
pub struct ClientBuilder {
    address: String,
    transport: Option<Arc<dyn Transport>>,
    client: Option<reqwest::Client>,
    unique_id: Option<String>,
    device_name: String,
    base_url_https: Option<String>,
    base_url_http: Option<String>,
    request_timeout: Duration,
    user_agent: String,
}

impl ClientBuilder {
    /// Create a builder targeting `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            transport: None,
            client: None,
            unique_id: None,
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            base_url_https: None,
            base_url_http: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Use a custom transport (platform bridge, test fake, ...).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom reqwest client for the default transport.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the client's opaque unique id (generated when absent).
    pub fn unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Set the device name sent during pairing.
    pub fn device_name(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = device_name.into();
        self
    }

    /// Override the HTTPS base URL (tests, reverse proxies).
    pub fn base_url_https(mut self, url: impl Into<String>) -> Self {
        self.base_url_https = Some(url.into());
        self
    }

    /// Override the plaintext HTTP base URL (tests, reverse proxies).
    pub fn base_url_http(mut self, url: impl Into<String>) -> Self {
        self.base_url_http = Some(url.into());
        self
    }

    /// Set the request timeout of the default transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the User-Agent of the default transport.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NvHttpClient> {
        let transport: Arc<dyn Transport> = match (self.transport, self.client) {
            (Some(transport), _) => transport,
            (None, Some(client)) => Arc::new(HttpTransport::with_client(client)),
            (None, None) => Arc::new(HttpTransport::with_config(
                self.request_timeout,
                &self.user_agent,
            )?),
        };

        let base_url_https = self
            .base_url_https
            .unwrap_or_else(|| format!("https://{}:{}", self.address, DEFAULT_HTTPS_PORT));
        let base_url_http = self
            .base_url_http
            .unwrap_or_else(|| format!("http://{}:{}", self.address, DEFAULT_HTTP_PORT));

        Ok(NvHttpClient {
            transport,
            address: self.address,
            base_url_https,
            base_url_http,
            unique_id: self.unique_id.unwrap_or_else(uid::generate_unique_id),
            device_name: self.device_name,
            paired: false,
            current_game: 0,
            server_major_version: 0,
            server_state: String::new(),
            app_list_cache: None,
        })
    }
}
