//! Single active session
//!
//! [`Session`] wires the login flow, the dashboard flow and the record list
//! together:
//! - A successful login hands its keypass to the dashboard flow by value
//! - A loaded collection replaces the controller's list
//! - Selecting a record yields a [`DetailRequest`]
//! - Logout discards the keypass and returns everything to idle

use crate::controller::{RecordListController, RecordSummary};
use crate::detail::DetailRequest;
use crate::diff::ListDiff;
use crate::error::{CoreError, Result};
use crate::flows::{DashboardFlow, LoginFlow};
use crate::load_state::LoadState;
use entiview_client::{ApiClient, Credentials, Keypass};
use entiview_record::{RecordCollection, TitleStrategy};
use tokio::task::JoinHandle;

/// The one active session of the client
#[derive(Debug)]
pub struct Session {
    login: LoginFlow,
    dashboard: DashboardFlow,
    controller: RecordListController,
    keypass: Option<Keypass>,
}

impl Session {
    /// Create a logged-out session
    #[must_use]
    pub fn new(api: &ApiClient, strategy: TitleStrategy) -> Self {
        Self {
            login: LoginFlow::new(api.session()),
            dashboard: DashboardFlow::new(api.collection()),
            controller: RecordListController::new(strategy),
            keypass: None,
        }
    }

    /// Log in and keep the keypass
    ///
    /// # Errors
    /// - `CoreError::Login` with the user-facing failure message
    /// - `CoreError::Superseded` if a reset overtook the attempt
    pub async fn login(&mut self, credentials: Credentials) -> Result<()> {
        join(self.login.submit(credentials)).await?;

        match self.login.state() {
            LoadState::Loaded(keypass) => {
                tracing::info!("logged in");
                self.keypass = Some(keypass);
                Ok(())
            }
            LoadState::Failed(message) => Err(CoreError::Login(message)),
            LoadState::Idle | LoadState::Loading => Err(CoreError::Superseded),
        }
    }

    /// Load the dashboard with the session keypass and adopt the result
    ///
    /// # Errors
    /// - `CoreError::NotLoggedIn` without a keypass
    /// - `CoreError::Dashboard` with the user-facing failure message
    /// - `CoreError::Superseded` if a newer fetch or a logout overtook it
    pub async fn load_dashboard(&mut self) -> Result<ListDiff> {
        let keypass = self.keypass.clone().ok_or(CoreError::NotLoggedIn)?;
        let handle = self.dashboard.load(keypass);
        self.adopt(handle).await
    }

    /// Fetch the dashboard again with the keypass it already holds
    ///
    /// # Errors
    /// Same as [`load_dashboard`](Self::load_dashboard)
    pub async fn refresh(&mut self) -> Result<ListDiff> {
        let handle = self.dashboard.refresh()?;
        self.adopt(handle).await
    }

    async fn adopt(&mut self, handle: JoinHandle<bool>) -> Result<ListDiff> {
        if !join(handle).await? {
            return Err(CoreError::Superseded);
        }
        match self.dashboard.state() {
            LoadState::Loaded(collection) => Ok(self.controller.set_collection(collection)),
            LoadState::Failed(message) => Err(CoreError::Dashboard(message)),
            LoadState::Idle | LoadState::Loading => Err(CoreError::Superseded),
        }
    }

    /// Detail view request for the record at `index`
    ///
    /// # Errors
    /// - `CoreError::NotLoggedIn` without a keypass
    /// - `CoreError::Controller` if `index` is out of range
    pub fn open_detail(&self, index: usize) -> Result<DetailRequest> {
        let keypass = self.keypass.clone().ok_or(CoreError::NotLoggedIn)?;
        let record = self.controller.select_record(index)?;
        Ok(DetailRequest {
            payload: self.controller.build_detail_payload(record),
            keypass,
        })
    }

    /// Discard the keypass, reset both flows and clear the list
    pub fn logout(&mut self) {
        if self.keypass.take().is_some() {
            tracing::info!("logged out");
        }
        self.login.reset();
        self.dashboard.reset();
        self.controller.clear();
    }

    #[inline]
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.keypass.is_some()
    }

    #[inline]
    #[must_use]
    pub fn keypass(&self) -> Option<&Keypass> {
        self.keypass.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn login_flow(&self) -> &LoginFlow {
        &self.login
    }

    #[inline]
    #[must_use]
    pub fn dashboard_flow(&self) -> &DashboardFlow {
        &self.dashboard
    }

    #[inline]
    #[must_use]
    pub fn controller(&self) -> &RecordListController {
        &self.controller
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<RecordSummary> {
        self.controller.summaries()
    }

    #[must_use]
    pub fn dashboard_state(&self) -> LoadState<RecordCollection> {
        self.dashboard.state()
    }
}

async fn join(handle: JoinHandle<bool>) -> Result<bool> {
    handle.await.map_err(|err| CoreError::Task(err.to_string()))
}
