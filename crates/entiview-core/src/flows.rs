//! Login and dashboard flows
//!
//! Each flow pairs one API client with one [`LoadTracker`]. Triggers are
//! non-blocking: the tracker enters `Loading` before the call is spawned,
//! and the spawned task commits `Loaded` or `Failed(user message)` unless a
//! newer trigger or a reset got there first.

use crate::error::CoreError;
use crate::load_state::LoadState;
use crate::tracker::LoadTracker;
use entiview_client::{CollectionClient, Credentials, Keypass, SessionClient};
use entiview_record::RecordCollection;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Credential exchange flow
#[derive(Debug, Clone)]
pub struct LoginFlow {
    client: SessionClient,
    tracker: LoadTracker<Keypass>,
}

impl LoginFlow {
    #[must_use]
    pub fn new(client: SessionClient) -> Self {
        Self {
            client,
            tracker: LoadTracker::new("login"),
        }
    }

    /// Submit credentials
    ///
    /// Blank credentials also pass through `Loading` and end in `Failed`
    /// without a request being sent.
    pub fn submit(&self, credentials: Credentials) -> JoinHandle<bool> {
        let client = self.client.clone();
        self.tracker.trigger(async move {
            client
                .authenticate(credentials)
                .await
                .map_err(|err| err.user_message())
        })
    }

    #[must_use]
    pub fn state(&self) -> LoadState<Keypass> {
        self.tracker.state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<Keypass>> {
        self.tracker.subscribe()
    }

    /// Keypass of the latest successful login
    #[must_use]
    pub fn keypass(&self) -> Option<Keypass> {
        self.tracker.state().loaded().cloned()
    }

    #[inline]
    #[must_use]
    pub fn tracker(&self) -> &LoadTracker<Keypass> {
        &self.tracker
    }

    pub fn reset(&self) {
        self.tracker.reset();
    }
}

/// Dashboard flow, bound to the keypass handed over by login
#[derive(Debug, Clone)]
pub struct DashboardFlow {
    client: CollectionClient,
    tracker: LoadTracker<RecordCollection>,
    keypass: Arc<Mutex<Option<Keypass>>>,
}

impl DashboardFlow {
    #[must_use]
    pub fn new(client: CollectionClient) -> Self {
        Self {
            client,
            tracker: LoadTracker::new("dashboard"),
            keypass: Arc::new(Mutex::new(None)),
        }
    }

    /// Take ownership of `keypass` and fetch the collection
    pub fn load(&self, keypass: Keypass) -> JoinHandle<bool> {
        *self.keypass.lock() = Some(keypass.clone());
        self.fetch(keypass)
    }

    /// Fetch again with the held keypass
    ///
    /// # Errors
    /// `CoreError::NotLoggedIn` when no keypass has been handed over
    pub fn refresh(&self) -> Result<JoinHandle<bool>, CoreError> {
        let keypass = self.keypass.lock().clone().ok_or(CoreError::NotLoggedIn)?;
        Ok(self.fetch(keypass))
    }

    fn fetch(&self, keypass: Keypass) -> JoinHandle<bool> {
        let client = self.client.clone();
        self.tracker.trigger(async move {
            client
                .fetch_collection(&keypass)
                .await
                .map_err(|err| err.user_message())
        })
    }

    #[must_use]
    pub fn state(&self) -> LoadState<RecordCollection> {
        self.tracker.state()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoadState<RecordCollection>> {
        self.tracker.subscribe()
    }

    #[must_use]
    pub fn keypass(&self) -> Option<Keypass> {
        self.keypass.lock().clone()
    }

    #[inline]
    #[must_use]
    pub fn tracker(&self) -> &LoadTracker<RecordCollection> {
        &self.tracker
    }

    /// Drop the keypass and return to `Idle`; in-flight fetches go stale
    pub fn reset(&self) {
        self.keypass.lock().take();
        self.tracker.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entiview_client::ApiClient;
    use entiview_client::ApiConfig;
    use entiview_test_utils::{StubReply, StubServer, TEST_KEYPASS};
    use serde_json::json;

    fn api(server: &StubServer) -> ApiClient {
        let config = ApiConfig::new()
            .with_base_url(server.base_url())
            .without_dns_fallback();
        ApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn blank_login_fails_with_user_message() {
        let server = StubServer::start().await;
        let flow = LoginFlow::new(api(&server).session());

        let handle = flow.submit(Credentials::new(" ", "pw"));
        assert!(flow.state().is_loading());
        assert!(handle.await.unwrap());

        assert_eq!(
            flow.state(),
            LoadState::Failed("Username and password cannot be empty".into())
        );
        assert_eq!(server.auth_hits(), 0);
    }

    #[tokio::test]
    async fn login_then_dashboard() {
        let server = StubServer::start().await;
        let api = api(&server);
        let login = LoginFlow::new(api.session());
        let dashboard = DashboardFlow::new(api.collection());

        assert!(login.submit(Credentials::new("alice", "secret")).await.unwrap());
        let keypass = login.keypass().unwrap();
        assert_eq!(keypass.as_str(), TEST_KEYPASS);

        assert!(dashboard.load(keypass).await.unwrap());
        let collection = dashboard.state().loaded().cloned().unwrap();
        assert_eq!(collection.records()[0].get("name"), "Widget");
    }

    #[tokio::test]
    async fn refresh_needs_a_keypass() {
        let server = StubServer::start().await;
        let dashboard = DashboardFlow::new(api(&server).collection());
        assert_eq!(dashboard.refresh().unwrap_err(), CoreError::NotLoggedIn);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_keypass_for_retry() {
        let server = StubServer::start().await;
        server.set_dashboard_reply(StubReply::json(401, &json!({"error": "expired"})));
        let dashboard = DashboardFlow::new(api(&server).collection());

        assert!(dashboard.load(Keypass::new(TEST_KEYPASS)).await.unwrap());
        assert_eq!(
            dashboard.state(),
            LoadState::Failed("Failed to load dashboard: expired".into())
        );
        assert!(dashboard.keypass().is_some());

        server.set_dashboard_reply(StubReply::ok(&entiview_test_utils::widget_dashboard()));
        assert!(dashboard.refresh().unwrap().await.unwrap());
        assert_eq!(dashboard.state().loaded().map(RecordCollection::len), Some(1));
    }

    #[tokio::test]
    async fn reset_discards_in_flight_fetch() {
        let server = StubServer::start().await;
        server.set_dashboard_reply(
            StubReply::ok(&entiview_test_utils::widget_dashboard())
                .with_delay(std::time::Duration::from_millis(200)),
        );
        let dashboard = DashboardFlow::new(api(&server).collection());

        let handle = dashboard.load(Keypass::new(TEST_KEYPASS));
        dashboard.reset();

        assert!(!handle.await.unwrap());
        assert_eq!(dashboard.state(), LoadState::Idle);
        assert!(dashboard.keypass().is_none());
    }
}
