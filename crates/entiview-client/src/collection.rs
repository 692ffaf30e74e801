//! Dashboard retrieval
//!
//! [`CollectionClient::fetch_collection`] loads the entities visible to a
//! keypass. The keypass travels in the request path, never in a header.

use crate::error::FetchError;
use crate::session::Keypass;
use crate::transport::{Request, Transport};
use entiview_record::{DynamicRecord, RecordCollection};
use serde::Deserialize;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// First path segment of the dashboard endpoint
pub const DASHBOARD_PATH: &str = "dashboard";

#[derive(Deserialize)]
struct DashboardResponse {
    entities: Vec<DynamicRecord>,
    #[serde(rename = "entityTotal", default)]
    entity_total: i64,
}

/// Fetches entity collections
#[derive(Clone)]
pub struct CollectionClient {
    transport: Arc<dyn Transport>,
}

impl CollectionClient {
    /// Create a client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the dashboard for `keypass`
    ///
    /// A failure leaves the keypass untouched; the same call may be retried.
    ///
    /// # Errors
    /// - `FetchError::Rejected` for a non-success status, including expired tokens
    /// - `FetchError::EmptyResponse` if the body is not a dashboard object
    /// - `FetchError::NetworkFailure` if the transport fails
    pub async fn fetch_collection(&self, keypass: &Keypass) -> Result<RecordCollection, FetchError> {
        let request = Request::get([DASHBOARD_PATH, keypass.as_str()]);

        let response = self.transport.send(request).await.map_err(|err| {
            tracing::warn!(error = %err, "dashboard fetch failed in transport");
            FetchError::from(err)
        })?;

        if !response.is_success() {
            let rejection = response.rejection();
            tracing::info!(status = rejection.status, "dashboard fetch rejected");
            return Err(FetchError::Rejected(rejection));
        }

        let body: DashboardResponse = serde_json::from_str(&response.body).map_err(|err| {
            tracing::warn!(error = %err, "dashboard body did not decode");
            FetchError::EmptyResponse
        })?;

        let collection = RecordCollection::new(body.entities, body.entity_total);
        tracing::info!(
            records = collection.len(),
            declared_total = collection.declared_total(),
            "dashboard loaded"
        );
        Ok(collection)
    }
}

impl Debug for CollectionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Rejection, TransportError};
    use crate::transport::{Method, MockTransport, RawResponse};

    fn client_returning(status: u16, body: &'static str) -> CollectionClient {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .returning(move |_| Ok(RawResponse::new(status, body)));
        CollectionClient::new(Arc::new(mock))
    }

    #[tokio::test]
    async fn keypass_goes_into_the_path() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .times(1)
            .withf(|req| req.method == Method::Get && req.segments == ["dashboard", "tok-1"] && req.body.is_none())
            .returning(|_| Ok(RawResponse::new(200, r#"{"entities":[],"entityTotal":0}"#)));

        let collection = CollectionClient::new(Arc::new(mock))
            .fetch_collection(&Keypass::new("tok-1"))
            .await
            .unwrap();
        assert!(collection.is_empty());
    }

    #[tokio::test]
    async fn decodes_records_in_order() {
        let client = client_returning(
            200,
            r#"{"entities":[{"id":1,"name":"Widget"},{"name":"Gadget","id":2}],"entityTotal":5,"page":1}"#,
        );

        let collection = client.fetch_collection(&Keypass::new("k")).await.unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.declared_total(), 5);
        assert_eq!(collection.records()[0].display_name(), "1");
        assert_eq!(collection.records()[1].display_name(), "Gadget");
    }

    #[tokio::test]
    async fn missing_total_defaults_to_zero() {
        let client = client_returning(200, r#"{"entities":[{"a":true}]}"#);
        let collection = client.fetch_collection(&Keypass::new("k")).await.unwrap();
        assert_eq!(collection.declared_total(), 0);
        assert!(collection.total_mismatch());
    }

    #[tokio::test]
    async fn malformed_bodies_are_empty_responses() {
        for body in ["", "{}", r#"{"entities":null}"#, r#"{"entities":[1,2]}"#, "<html>"] {
            let result = client_returning(200, body).fetch_collection(&Keypass::new("k")).await;
            assert_eq!(result, Err(FetchError::EmptyResponse), "body {body:?}");
        }
    }

    #[tokio::test]
    async fn expired_token_is_rejection_with_server_text() {
        let result = client_returning(401, r#"{"error":"expired"}"#)
            .fetch_collection(&Keypass::new("old"))
            .await;
        assert_eq!(result, Err(FetchError::Rejected(Rejection::new(401, "expired"))));
    }

    #[tokio::test]
    async fn transport_failure_is_network_failure() {
        let mut mock = MockTransport::new();
        mock.expect_send()
            .returning(|_| Err(TransportError::Timeout("read".into())));

        let result = CollectionClient::new(Arc::new(mock))
            .fetch_collection(&Keypass::new("k"))
            .await;
        assert!(matches!(result, Err(FetchError::NetworkFailure(detail)) if detail.contains("read")));
    }
}
