//! # nvhttp - GameStream Host Control Client for Rust
//!
//! `nvhttp` is an idiomatic Rust client for the control HTTP API exposed by
//! NVIDIA GameStream hosts (GeForce Experience, Sunshine): server status,
//! pairing, application listing, launch/resume/quit and box-art retrieval.
//!
//! ## Features
//!
//! - **Server status**: pairing state, active session and protocol version
//!   from `/serverinfo`, with automatic HTTPS to HTTP fallback
//! - **Application directory**: typed, cached `/applist` with id and title
//!   lookups
//! - **Session control**: launch, resume and quit streaming sessions
//! - **Pairing**: the documented challenge handshake over an injectable
//!   transport bridge
//! - **Async/Await**: built on tokio, one HTTP round trip per operation
//! - **Type-Safe**: every endpoint response is deserialized into a validated
//!   struct; malformed documents surface structured errors
//!
//! ## Quick Start
//!
//! ```no_run
//! use nvhttp::NvHttpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = NvHttpClient::new("192.168.1.100")?;
//!
//!     client.refresh_server_info().await?;
//!     println!("paired: {}, state: {}", client.paired(), client.server_state());
//!
//!     for app in client.app_list().await? {
//!         println!("{} (id {}, running: {})", app.title, app.id, app.running);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Transports
//!
//! The client never talks to the network directly: every request goes through
//! a [`Transport`]. The bundled [`HttpTransport`] covers the plain HTTP(S)
//! endpoints; the out-of-band pairing certificate exchange must come from a
//! platform bridge, supplied by implementing [`Transport`] and passing it to
//! [`ClientBuilder::transport`].
//!
//! ## Architecture
//!
//! - [`client`]: the [`NvHttpClient`] and its builder
//! - [`models`]: typed XML response models
//! - [`transport`]: the transport seam and default reqwest transport
//! - [`uid`]: per-request tokens and client identifiers
//! - [`error`]: error types and result alias

pub mod client;
pub mod error;
pub mod models;
pub mod transport;
pub mod uid;

// Re-exports for convenience
pub use client::{
    ClientBuilder, LaunchOptions, NvHttpClient, DEFAULT_DEVICE_NAME, DEFAULT_HTTPS_PORT,
    DEFAULT_HTTP_PORT,
};
pub use error::{Error, Result};
pub use models::{App, ServerInfo};
pub use transport::{HttpTransport, Transport};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
