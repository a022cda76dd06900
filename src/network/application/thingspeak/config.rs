//! Server endpoint and request settings.

use crate::network::application::http::exchange::DEFAULT_RESPONSE_TIMEOUT_MS;

/// Default server host.
pub const DEFAULT_HOST: &str = "api.thingspeak.com";

/// Plain HTTP port.
pub const HTTP_PORT: u16 = 80;

/// Port used when the transport is wrapped in TLS.
pub const HTTPS_PORT: u16 = 443;

/// Header that carries the write or read API key.
pub const API_KEY_HEADER: &str = "X-THINGSPEAKAPIKEY";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("tsfeed/", env!("CARGO_PKG_VERSION"));

/// Where requests go and how long to wait for answers.
///
/// ```rust
/// use tsfeed::network::application::thingspeak::Config;
///
/// let config = Config::secure();
/// assert_eq!(config.port, 443);
/// assert_eq!(config.host, "api.thingspeak.com");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub host: &'static str,
    pub port: u16,
    pub user_agent: &'static str,
    pub api_key_header: &'static str,
    /// Applied separately to the header wait and the body wait.
    pub response_timeout_ms: u64,
}

impl Config {
    /// Settings for a transport that performs TLS itself.
    pub const fn secure() -> Self {
        Self {
            port: HTTPS_PORT,
            ..Self::plain()
        }
    }

    const fn plain() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: HTTP_PORT,
            user_agent: USER_AGENT,
            api_key_header: API_KEY_HEADER,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::plain()
    }
}
