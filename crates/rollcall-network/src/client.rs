//! Shared HTTP client setup.

use crate::error::{NetworkError, Result};
use rollcall_core::config::ServerConfig;
use rollcall_core::constants::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};
use std::time::Duration;

/// Configuration for the directory and ledger client.
///
/// # Example
///
/// ```
/// use rollcall_network::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig {
///     base_url: "http://10.56.2.3:8090".to_string(),
///     timeout: Duration::from_millis(5000),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL shared by the directory and the ledger, without trailing slash
    pub base_url: String,

    /// Transport timeout of a single request (connect + response)
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl From<&ServerConfig> for ClientConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            base_url: server.base_url().to_string(),
            timeout: server.request_timeout(),
        }
    }
}

impl ClientConfig {
    /// Absolute URL of `path` on the configured service.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build the HTTP client used for every request.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Setup` if the TLS backend cannot be initialized.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("rollcall/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::Setup(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_config() {
        let server = ServerConfig {
            base_url: "http://10.56.2.3:8090/".to_string(),
            request_timeout_ms: 2500,
        };
        let config = ClientConfig::from(&server);

        assert_eq!(config.base_url, "http://10.56.2.3:8090");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_url_joins_path() {
        let config = ClientConfig {
            base_url: "http://host:8090/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.url("/api/collections/students/records"),
            "http://host:8090/api/collections/students/records"
        );
    }

    #[test]
    fn test_build_client() {
        assert!(ClientConfig::default().build_client().is_ok());
    }
}
