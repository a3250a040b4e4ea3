//! REST key-value backend
//!
//! Speaks the Firebase-RTDB-style JSON REST dialect: records live at
//! `{base}/{tree}/{CODE}.json`, a `GET` of an absent key returns the JSON
//! literal `null`, `PUT` creates, `DELETE` removes. The backend's own
//! durability and security-rule enforcement are relied upon, not re-checked.

use crate::{ObjectRecord, ObjectStore, Result, StoreError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

/// Configuration for the REST store
#[derive(Clone, Debug)]
pub struct RestConfig {
    /// Base URL of the database (e.g., "https://drop.example.com")
    pub base_url: String,
    /// Top-level tree the records live under
    pub tree: String,
    /// Request timeout
    pub timeout: Duration,
    /// Optional auth token appended as a query parameter
    pub auth_token: Option<String>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            tree: "files".to_string(),
            timeout: Duration::from_secs(30),
            auth_token: None,
        }
    }
}

impl RestConfig {
    /// Create with a custom base URL
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the auth token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Object store backed by a remote JSON REST key-value database
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    /// Create a new REST store
    pub fn new(config: RestConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Backend(format!("failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create from a URL string with default settings
    pub fn from_url(url: &str) -> Result<Self> {
        Self::new(RestConfig::with_url(url))
    }

    fn record_url(&self, code: &str) -> String {
        format!("{}/{}/{}.json", self.config.base_url, self.config.tree, code)
    }

    // reqwest percent-encodes the token; it must never be spliced into the
    // URL by hand
    fn request(&self, method: reqwest::Method, code: &str) -> reqwest::RequestBuilder {
        let mut request = self.client.request(method, self.record_url(code));
        if let Some(ref token) = self.config.auth_token {
            request = request.query(&[("auth", token)]);
        }
        request
    }
}

#[async_trait]
impl ObjectStore for RestStore {
    #[instrument(skip(self, record), fields(code = %record.code))]
    async fn put(&self, record: &ObjectRecord) -> Result<()> {
        let response = self
            .request(reqwest::Method::PUT, &record.code)
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "put rejected with {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, code: &str) -> Result<Option<ObjectRecord>> {
        let response = self.request(reqwest::Method::GET, code).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "get rejected with {}: {}",
                status, body
            )));
        }

        // An absent key comes back as the JSON literal `null`
        response
            .json::<Option<ObjectRecord>>()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn remove(&self, code: &str) -> Result<()> {
        let response = self.request(reqwest::Method::DELETE, code).send().await?;

        // Deleting an absent key is not an error
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "remove rejected with {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(code: &str) -> ObjectRecord {
        ObjectRecord {
            code: code.to_string(),
            file_name: "report.pdf".to_string(),
            file_size: 35226,
            file_type: "application/pdf".to_string(),
            payload: Payload::Encrypted {
                data: "AQID".to_string(),
                encrypted_key: "BAUG".to_string(),
            },
            uploaded_at: 1_683_717_045_813,
            expires_at: 1_683_721_245_813,
        }
    }

    #[tokio::test]
    async fn test_put_sends_record_json() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/files/Q9042Y.json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let store = RestStore::from_url(&server.uri()).unwrap();
        store.put(&record("Q9042Y")).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_parses_record() {
        let server = MockServer::start().await;
        let body = serde_json::to_value(record("Q9042Y")).unwrap();
        Mock::given(method("GET"))
            .and(path("/files/Q9042Y.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let store = RestStore::from_url(&server.uri()).unwrap();
        let fetched = store.get("Q9042Y").await.unwrap().unwrap();
        assert_eq!(fetched, record("Q9042Y"));
    }

    #[tokio::test]
    async fn test_get_null_body_means_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/ABSENT0.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        let store = RestStore::from_url(&server.uri()).unwrap();
        assert!(store.get("ABSENT0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_failure_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(401).set_body_string("permission denied"))
            .mount(&server)
            .await;

        let store = RestStore::from_url(&server.uri()).unwrap();
        let result = store.put(&record("Q9042Y")).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_key() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/GONE00.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = RestStore::from_url(&server.uri()).unwrap();
        store.remove("GONE00").await.unwrap();
    }

    #[tokio::test]
    async fn test_auth_token_appended_to_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/Q9042Y.json"))
            .and(wiremock::matchers::query_param("auth", "sekrit"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let config = RestConfig::with_url(server.uri()).with_auth_token("sekrit");
        let store = RestStore::new(config).unwrap();
        assert!(store.get("Q9042Y").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_auth_token_with_reserved_characters_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/Q9042Y.json"))
            .and(wiremock::matchers::query_param("auth", "a&b=c#d+e"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .expect(1)
            .mount(&server)
            .await;

        let config = RestConfig::with_url(server.uri()).with_auth_token("a&b=c#d+e");
        let store = RestStore::new(config).unwrap();
        assert!(store.get("Q9042Y").await.unwrap().is_none());
    }
}
