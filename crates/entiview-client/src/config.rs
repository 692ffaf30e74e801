//! Client configuration
//!
//! Everything the HTTP layer needs is carried in [`ApiConfig`] and handed to
//! [`ApiClient::new`](crate::ApiClient::new) explicitly.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::Duration;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "https://nit3213api.onrender.com/";

/// Default timeout for connect, read and write, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Literal addresses tried for one host when system DNS fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsFallback {
    /// Host name as it appears in the base URL
    pub host: String,
    /// Addresses to use instead
    pub addrs: Vec<IpAddr>,
}

impl DnsFallback {
    /// Create a fallback entry
    #[inline]
    #[must_use]
    pub fn new(host: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        Self {
            host: host.into(),
            addrs,
        }
    }
}

/// API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL both endpoints are resolved against
    pub base_url: String,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds
    pub read_timeout_secs: u64,
    /// Write timeout in seconds
    pub write_timeout_secs: u64,
    /// Per-host DNS fallback table
    pub dns_fallback: Vec<DnsFallback>,
}

impl ApiConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set connect, read and write timeouts to the same value
    ///
    /// Timeouts are kept in whole seconds; a fractional part rounds up, so
    /// only `Duration::ZERO` yields a zero timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.connect_timeout_secs = secs;
        self.read_timeout_secs = secs;
        self.write_timeout_secs = secs;
        self
    }

    /// Add a DNS fallback entry
    #[inline]
    #[must_use]
    pub fn with_dns_fallback(mut self, host: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        self.dns_fallback.push(DnsFallback::new(host, addrs));
        self
    }

    /// Drop every DNS fallback entry
    #[inline]
    #[must_use]
    pub fn without_dns_fallback(mut self) -> Self {
        self.dns_fallback.clear();
        self
    }

    /// Parse TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// - `ConfigError::Parse` if the text is not valid TOML for this shape
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if its contents do not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check the configuration and return the normalized base URL
    ///
    /// The returned URL always ends in `/` so endpoint paths append to it.
    ///
    /// # Errors
    /// - `ConfigError::InvalidBaseUrl` if the URL does not parse
    /// - `ConfigError::UnsupportedScheme` for anything but http/https
    /// - `ConfigError::ZeroTimeout` if any timeout is zero
    pub fn validate(&self) -> Result<Url, ConfigError> {
        for (name, secs) in [
            ("connect", self.connect_timeout_secs),
            ("read", self.read_timeout_secs),
            ("write", self.write_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }

        let mut url = Url::parse(&self.base_url).map_err(|err| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Connection establishment timeout
    #[inline]
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Read timeout
    #[inline]
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Upper bound for a whole request
    ///
    /// The HTTP client has no separate write timeout, so the write budget is
    /// folded into the total together with connect and read.
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout_secs
                .saturating_add(self.read_timeout_secs)
                .saturating_add(self.write_timeout_secs),
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_TIMEOUT_SECS,
            dns_fallback: vec![DnsFallback::new(
                "nit3213api.onrender.com",
                vec![
                    IpAddr::V4(Ipv4Addr::new(216, 24, 57, 4)),
                    IpAddr::V4(Ipv4Addr::new(216, 24, 57, 252)),
                ],
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_host() {
        let config = ApiConfig::default();
        assert_eq!(config.validate().unwrap().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(90));
        assert_eq!(config.dns_fallback[0].addrs.len(), 2);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = ApiConfig::new().with_base_url("http://127.0.0.1:8080/api");
        assert_eq!(config.validate().unwrap().as_str(), "http://127.0.0.1:8080/api/");
    }

    #[test]
    fn rejects_bad_urls_and_timeouts() {
        let bad = ApiConfig::new().with_base_url("not a url");
        assert!(matches!(bad.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        let ftp = ApiConfig::new().with_base_url("ftp://example.com/");
        assert!(matches!(ftp.validate(), Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"));

        let zero = ApiConfig::new().with_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(ConfigError::ZeroTimeout("connect"))));
    }

    #[test]
    fn fractional_timeouts_round_up() {
        let half = ApiConfig::new().with_timeout(Duration::from_millis(500));
        assert_eq!(half.connect_timeout_secs, 1);
        assert_eq!(half.read_timeout_secs, 1);
        assert_eq!(half.write_timeout_secs, 1);
        assert!(half.validate().is_ok());

        let longer = ApiConfig::new().with_timeout(Duration::from_millis(1500));
        assert_eq!(longer.read_timeout(), Duration::from_secs(2));

        let whole = ApiConfig::new().with_timeout(Duration::from_secs(3));
        assert_eq!(whole.connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = ApiConfig::from_toml_str(
            r#"
            base_url = "http://localhost:9000/"
            read_timeout_secs = 5

            [[dns_fallback]]
            host = "api.internal"
            addrs = ["10.0.0.7"]
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000/");
        assert_eq!(config.read_timeout_secs, 5);
        assert_eq!(config.connect_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.dns_fallback, vec![DnsFallback::new("api.internal", vec!["10.0.0.7".parse().unwrap()])]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connect_timeout_secs = 7").unwrap();

        let config = ApiConfig::load(file.path()).unwrap();
        assert_eq!(config.connect_timeout_secs, 7);

        let missing = ApiConfig::load("/definitely/not/here.toml");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
