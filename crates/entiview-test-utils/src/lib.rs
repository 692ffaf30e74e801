//! Testing utilities for Entiview workspace
//!
//! A stub of the entity API served on a loopback port, plus JSON fixtures.

#![allow(missing_docs)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use warp::http::header::{HeaderValue, CONTENT_TYPE};
use warp::http::{Response, StatusCode};
use warp::hyper::body::Bytes;
use warp::Filter;

/// Keypass issued by the default auth reply
pub const TEST_KEYPASS: &str = "tok-1";

/// Dashboard body with a single widget entity
pub fn widget_dashboard() -> Value {
    json!({
        "entities": [{"id": 1, "name": "Widget"}],
        "entityTotal": 1
    })
}

/// Dashboard body with mixed field types and a diverging declared total
pub fn mixed_dashboard() -> Value {
    json!({
        "entities": [
            {"artistName": "Claude Monet", "nationality": "French", "description": "Impressionist painter", "born": 1840},
            {"artistName": "Frida Kahlo", "nationality": "Mexican", "desc": "Self portraits", "active": false},
            {"artistName": "Ai Weiwei", "nationality": null, "works": ["Sunflower Seeds"]}
        ],
        "entityTotal": 7
    })
}

/// Canned answer for one endpoint
#[derive(Debug, Clone)]
pub struct StubReply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubReply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn ok(body: &Value) -> Self {
        Self::json(200, body)
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug)]
struct StubState {
    auth_reply: Mutex<StubReply>,
    dashboard_reply: Mutex<StubReply>,
    auth_hits: AtomicUsize,
    dashboard_hits: AtomicUsize,
    auth_bodies: Mutex<Vec<Value>>,
    dashboard_keypasses: Mutex<Vec<String>>,
}

/// Entity API stub bound to `127.0.0.1` on an ephemeral port
///
/// Shuts down when dropped. Must be started inside a tokio runtime.
#[derive(Debug)]
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<StubState>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    /// Start with default replies: a keypass for any login and the widget dashboard
    pub async fn start() -> Self {
        Self::start_with(
            StubReply::ok(&json!({ "keypass": TEST_KEYPASS })),
            StubReply::ok(&widget_dashboard()),
        )
        .await
    }

    /// Start with explicit replies
    pub async fn start_with(auth: StubReply, dashboard: StubReply) -> Self {
        let state = Arc::new(StubState {
            auth_reply: Mutex::new(auth),
            dashboard_reply: Mutex::new(dashboard),
            auth_hits: AtomicUsize::new(0),
            dashboard_hits: AtomicUsize::new(0),
            auth_bodies: Mutex::new(Vec::new()),
            dashboard_keypasses: Mutex::new(Vec::new()),
        });

        let with_state = {
            let state = Arc::clone(&state);
            warp::any().map(move || Arc::clone(&state))
        };

        let auth = warp::post()
            .and(warp::path!("sydney" / "auth"))
            .and(warp::body::bytes())
            .and(with_state.clone())
            .and_then(handle_auth);

        let dashboard = warp::get()
            .and(warp::path!("dashboard" / String))
            .and(with_state)
            .and_then(handle_dashboard);

        let (tx, rx) = oneshot::channel::<()>();
        let (addr, server) = warp::serve(auth.or(dashboard))
            .bind_with_graceful_shutdown(([127, 0, 0, 1], 0), async move {
                rx.await.ok();
            });
        tokio::spawn(server);

        Self {
            addr,
            state,
            shutdown: Some(tx),
        }
    }

    /// Base URL with trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn set_auth_reply(&self, reply: StubReply) {
        *self.state.auth_reply.lock() = reply;
    }

    pub fn set_dashboard_reply(&self, reply: StubReply) {
        *self.state.dashboard_reply.lock() = reply;
    }

    pub fn auth_hits(&self) -> usize {
        self.state.auth_hits.load(Ordering::SeqCst)
    }

    pub fn dashboard_hits(&self) -> usize {
        self.state.dashboard_hits.load(Ordering::SeqCst)
    }

    /// Login bodies received, in order; bodies that were not JSON appear as strings
    pub fn auth_bodies(&self) -> Vec<Value> {
        self.state.auth_bodies.lock().clone()
    }

    /// Keypass path segments received, in order
    pub fn dashboard_keypasses(&self) -> Vec<String> {
        self.state.dashboard_keypasses.lock().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn handle_auth(body: Bytes, state: Arc<StubState>) -> Result<Response<String>, Infallible> {
    let body = serde_json::from_slice(&body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
    state.auth_bodies.lock().push(body);
    state.auth_hits.fetch_add(1, Ordering::SeqCst);

    let reply = state.auth_reply.lock().clone();
    Ok(respond(reply).await)
}

async fn handle_dashboard(keypass: String, state: Arc<StubState>) -> Result<Response<String>, Infallible> {
    state.dashboard_keypasses.lock().push(keypass);
    state.dashboard_hits.fetch_add(1, Ordering::SeqCst);

    let reply = state.dashboard_reply.lock().clone();
    Ok(respond(reply).await)
}

async fn respond(reply: StubReply) -> Response<String> {
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = Response::new(reply.body);
    *response.status_mut() = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
