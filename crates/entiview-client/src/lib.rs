//! Entiview API Client
//!
//! Async clients for the two endpoints of the entity API:
//! - `POST /sydney/auth` trades credentials for a keypass
//! - `GET /dashboard/{keypass}` returns the entity collection
//!
//! # Example
//!
//! ```rust,ignore
//! use entiview_client::{ApiClient, ApiConfig, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(&ApiConfig::default())?;
//!
//! let keypass = api.session().authenticate(Credentials::new("alice", "secret")).await?;
//! let collection = api.collection().fetch_collection(&keypass).await?;
//!
//! for record in collection.records() {
//!     println!("{}: {}", record.display_name(), record.describe());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod client;
pub mod collection;
pub mod config;
pub mod dns;
pub mod error;
pub mod session;
pub mod transport;

pub use client::ApiClient;
pub use collection::CollectionClient;
pub use config::{ApiConfig, DnsFallback};
pub use error::{AuthError, ConfigError, ErrorKind, FetchError, Rejection, TransportError};
pub use session::{Credentials, Keypass, SessionClient};
pub use transport::{HttpTransport, Method, RawResponse, Request, Transport};

pub use entiview_record::{DynamicRecord, RecordCollection};
