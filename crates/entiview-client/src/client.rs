//! Explicitly constructed API surface
//!
//! One [`ApiClient`] owns the transport; the session and collection clients
//! it hands out share it.

use crate::collection::CollectionClient;
use crate::config::ApiConfig;
use crate::error::ConfigError;
use crate::session::SessionClient;
use crate::transport::{HttpTransport, Transport};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Entry point for both API operations
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Build an HTTP-backed client
    ///
    /// # Errors
    /// - Any [`ConfigError`] from validating `config` or building the HTTP client
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Use a custom transport
    #[inline]
    #[must_use]
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Credential exchange client
    #[inline]
    #[must_use]
    pub fn session(&self) -> SessionClient {
        SessionClient::new(Arc::clone(&self.transport))
    }

    /// Dashboard client
    #[inline]
    #[must_use]
    pub fn collection(&self) -> CollectionClient {
        CollectionClient::new(Arc::clone(&self.transport))
    }
}

impl Debug for ApiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}
