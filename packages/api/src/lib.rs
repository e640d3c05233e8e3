//! # API crate: the backend connection shared by every page
//!
//! Owns the one [`Client`] the app talks through. The web binary calls [`init`] once
//! at startup with its [`ClientConfig`]; components reach the client with [`client`].
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`http`] | [`HttpRemote`], JSON over HTTP(S) with cookie sessions |
//! | [`backend`] | [`Backend`], HTTP or the in-memory demo backend, chosen by config |
//!
//! ## Configuration
//!
//! [`load_config`] parses the embedded `lifedesk.toml`. `LIFEDESK_API_URL` replaces
//! `api.base_url`: read at compile time for wasm builds, and at runtime (after loading
//! `.env` via `dotenvy`) for native builds.

use std::sync::OnceLock;

pub mod backend;
pub mod http;

pub use backend::Backend;
pub use http::HttpRemote;
pub use store::{Client, ClientConfig, SyncError, UserInfo};

/// Environment variable overriding the configured base URL.
pub const API_URL_ENV: &str = "LIFEDESK_API_URL";

static CLIENT: OnceLock<Client<Backend>> = OnceLock::new();
static CONFIG: OnceLock<ClientConfig> = OnceLock::new();

/// Parse `toml` (falling back to defaults) and apply the environment override.
pub fn load_config(toml: &str) -> ClientConfig {
    let config = ClientConfig::from_toml_or_default(toml);
    match api_url_override() {
        Some(url) => {
            tracing::info!("{API_URL_ENV} overrides base URL with {url}");
            config.with_base_url(url)
        }
        None => config,
    }
}

#[cfg(target_arch = "wasm32")]
fn api_url_override() -> Option<String> {
    option_env!("LIFEDESK_API_URL")
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
}

#[cfg(not(target_arch = "wasm32"))]
fn api_url_override() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Build the process-wide client. Later calls keep the first client.
pub fn init(config: ClientConfig) -> Result<&'static Client<Backend>, SyncError> {
    if let Some(client) = CLIENT.get() {
        tracing::warn!("api client already initialised; keeping the existing one");
        return Ok(client);
    }
    let backend = Backend::from_config(&config)?;
    let _ = CONFIG.set(config);
    Ok(CLIENT.get_or_init(|| Client::new(backend)))
}

/// The process-wide client, initialised with the default config on first use.
pub fn client() -> Result<&'static Client<Backend>, SyncError> {
    match CLIENT.get() {
        Some(client) => Ok(client),
        None => init(ClientConfig::default()),
    }
}

/// The config [`init`] was called with.
pub fn config() -> &'static ClientConfig {
    CONFIG.get_or_init(ClientConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_falls_back_on_garbage() {
        let config = load_config("not = [valid");
        assert_eq!(config.display, ClientConfig::default().display);
    }
}
