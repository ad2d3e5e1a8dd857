//! New Relic NerdGraph client.

use reqwest::StatusCode;
use serde_json::{json, Value};

use async_trait::async_trait;
use dashsync_core::DashboardGuid;

use crate::document::{excerpt, parse_document};
use crate::error::{FetchError, Result, SourceKind};
use crate::http::{transport_error, HttpConfig};
use crate::traits::MonitoringSource;

/// US region NerdGraph endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.newrelic.com/graphql";

/// EU region NerdGraph endpoint.
pub const EU_ENDPOINT: &str = "https://api.eu.newrelic.com/graphql";

/// Dashboard entity query. The field set is fixed; anything not requested
/// here is never compared.
pub const DASHBOARD_QUERY: &str = "query GetDashboard($guid: EntityGuid!) {
  actor {
    entity(guid: $guid) {
      ... on DashboardEntity {
        name
        description
        permissions
        pages {
          name
          description
          widgets {
            visualization { id }
            title
            layout { column row width height }
            rawConfiguration
          }
        }
        variables {
          name
          items { title value }
        }
      }
    }
  }
}";

const ORIGIN: SourceKind = SourceKind::Monitoring;

/// Fetches live dashboard definitions over NerdGraph.
#[derive(Debug, Clone)]
pub struct NerdGraphClient {
    endpoint: String,
    http: reqwest::Client,
}

impl NerdGraphClient {
    /// Client for the US endpoint.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, config)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            endpoint: endpoint.into(),
            http: config.build_client(ORIGIN)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// GraphQL request body for one dashboard.
pub fn request_body(guid: &DashboardGuid) -> Value {
    json!({
        "query": DASHBOARD_QUERY,
        "variables": { "guid": guid.as_str() },
    })
}

/// Pull the dashboard entity out of a NerdGraph response.
///
/// GraphQL errors take precedence over the HTTP status: NerdGraph reports
/// most failures with a 200 and an `errors` list.
pub fn extract_entity(guid: &DashboardGuid, status: StatusCode, body: &[u8]) -> Result<Value> {
    let mut response = match parse_document(ORIGIN, body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => return Err(status_error(status, body)),
        Err(err) => return Err(err),
    };

    if let Some(message) = first_graphql_error(&response) {
        return Err(FetchError::Remote {
            origin: ORIGIN,
            message,
        });
    }
    if !status.is_success() {
        return Err(status_error(status, body));
    }

    match response.pointer_mut("/data/actor/entity").map(Value::take) {
        Some(entity) if !entity.is_null() => Ok(entity),
        _ => Err(FetchError::MissingEntity {
            origin: ORIGIN,
            guid: guid.to_string(),
        }),
    }
}

fn first_graphql_error(response: &Value) -> Option<String> {
    let errors = response.get("errors")?.as_array()?;
    let first = errors.first()?;
    let message = first
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown GraphQL error");
    Some(message.to_owned())
}

fn status_error(status: StatusCode, body: &[u8]) -> FetchError {
    FetchError::Status {
        origin: ORIGIN,
        status: status.as_u16(),
        body: excerpt(body),
    }
}

#[async_trait]
impl MonitoringSource for NerdGraphClient {
    async fn fetch_dashboard(&self, guid: &DashboardGuid, api_key: &str) -> Result<Value> {
        tracing::debug!(endpoint = %self.endpoint, %guid, "querying dashboard entity");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Api-Key", api_key)
            .json(&request_body(guid))
            .send()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(ORIGIN, e))?;

        extract_entity(guid, status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guid() -> DashboardGuid {
        DashboardGuid::parse("MXxWSVp8REFTSEJPQVJEfDE").unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body(&guid());
        assert_eq!(body["variables"]["guid"], "MXxWSVp8REFTSEJPQVJEfDE");
        let query = body["query"].as_str().unwrap();
        for field in ["rawConfiguration", "permissions", "variables", "layout"] {
            assert!(query.contains(field), "query lacks {field}");
        }
    }

    #[test]
    fn test_extract_entity() {
        let body = br#"{"data":{"actor":{"entity":{"name":"Overview","pages":[]}}}}"#;
        let entity = extract_entity(&guid(), StatusCode::OK, body).unwrap();
        assert_eq!(entity, json!({"name": "Overview", "pages": []}));
    }

    #[test]
    fn test_graphql_error_wins_over_success_status() {
        let body = br#"{"errors":[{"message":"Invalid API key"},{"message":"second"}],"data":null}"#;
        let err = extract_entity(&guid(), StatusCode::OK, body).unwrap_err();
        assert_eq!(
            err,
            FetchError::Remote {
                origin: SourceKind::Monitoring,
                message: "Invalid API key".into()
            }
        );
    }

    #[test]
    fn test_graphql_error_wins_over_error_status() {
        let body = br#"{"errors":[{"message":"Unauthorized"}]}"#;
        let err = extract_entity(&guid(), StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(matches!(err, FetchError::Remote { .. }));
    }

    #[test]
    fn test_empty_error_list_is_ignored() {
        let body = br#"{"errors":[],"data":{"actor":{"entity":{"name":"D"}}}}"#;
        assert!(extract_entity(&guid(), StatusCode::OK, body).is_ok());
    }

    #[test]
    fn test_null_entity_is_missing() {
        let body = br#"{"data":{"actor":{"entity":null}}}"#;
        let err = extract_entity(&guid(), StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, FetchError::MissingEntity { .. }));
        assert!(err.to_string().contains("MXxWSVp8REFTSEJPQVJEfDE"));
    }

    #[test]
    fn test_absent_actor_is_missing() {
        let err = extract_entity(&guid(), StatusCode::OK, br#"{"data":{}}"#).unwrap_err();
        assert!(matches!(err, FetchError::MissingEntity { .. }));
    }

    #[test]
    fn test_non_json_error_page() {
        let err = extract_entity(&guid(), StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_non_json_success_is_parse_error() {
        let err = extract_entity(&guid(), StatusCode::OK, b"oops").unwrap_err();
        assert!(matches!(err, FetchError::Parse { origin: SourceKind::Monitoring, .. }));
    }
}
