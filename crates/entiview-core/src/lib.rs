//! Entiview Core
//!
//! Client-side state for browsing schema-less entities:
//! - [`LoadState`] and [`LoadTracker`]: generation-tagged state for one async flow
//! - [`LoginFlow`] and [`DashboardFlow`]: the two flows of the client
//! - [`RecordListController`]: ordered records, list diffs and detail payloads
//! - [`Session`]: the single active session tying them together
//!
//! # Example
//!
//! ```rust,ignore
//! use entiview_core::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(&ApiConfig::default())?;
//! let mut session = Session::new(&api, TitleStrategy::default());
//!
//! session.login(Credentials::new("alice", "secret")).await?;
//! session.load_dashboard().await?;
//!
//! for row in session.summaries() {
//!     println!("{}: {}", row.title, row.description);
//! }
//! let detail = session.open_detail(0)?;
//! println!("{}\n\n{}", detail.payload.title(), detail.payload.render());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod controller;
pub mod detail;
pub mod diff;
pub mod error;
pub mod flows;
pub mod load_state;
pub mod session;
pub mod tracker;

pub use controller::{RecordListController, RecordSummary, NO_DATA};
pub use detail::{DetailPayload, DetailRequest, DEFAULT_DETAIL_TITLE};
pub use diff::{Change, ListDiff};
pub use error::{ControllerError, CoreError, Result, TransitionError};
pub use flows::{DashboardFlow, LoginFlow};
pub use load_state::{allowed_transitions, validate_transition, LoadState, Phase};
pub use session::Session;
pub use tracker::{LoadTracker, Ticket};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Entiview
    pub use crate::{
        CoreError, DetailPayload, DetailRequest, LoadState, RecordListController, RecordSummary,
        Session,
    };
    pub use entiview_client::{ApiClient, ApiConfig, Credentials, Keypass};
    pub use entiview_record::{DynamicRecord, RecordCollection, TitleStrategy};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
