//! HTTP client for the family API
//!
//! Every endpoint answers with a JSON envelope `{ "data": ..., "meta": ... }`.

use super::error::ApiError;
use super::traits::FamilyApi;
use crate::state::{City, Family, FamilyPage, FamilyUpdate, PageMeta, State};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Default API address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:3000/api";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Option<PageMeta>,
}

/// Client for the family API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client for the given base address
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, ApiError> {
        tracing::debug!("GET {path} {query:?}");
        let response = self.http.get(self.url(path)).query(query).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

/// Map non-success responses to `ApiError`
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

#[async_trait]
impl FamilyApi for ApiClient {
    async fn get_family(&self, id: &str) -> Result<Family, ApiError> {
        let envelope: Envelope<Family> = self.get(&format!("family/{id}"), &[]).await?;
        Ok(envelope.data)
    }

    async fn list_families(&self, page: u32, limit: u32) -> Result<FamilyPage, ApiError> {
        let envelope: Envelope<Vec<Family>> = self
            .get(
                "family",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        let meta = envelope.meta.unwrap_or(PageMeta {
            page,
            limit,
            total: envelope.data.len() as u64,
        });
        Ok(FamilyPage {
            families: envelope.data,
            meta,
        })
    }

    async fn list_states(&self, country_id: i64) -> Result<Vec<State>, ApiError> {
        let envelope: Envelope<Vec<State>> = self
            .get("state", &[("country_id", country_id.to_string())])
            .await?;
        Ok(envelope.data)
    }

    async fn list_cities(&self, state_id: i64) -> Result<Vec<City>, ApiError> {
        let envelope: Envelope<Vec<City>> = self
            .get("city", &[("state_id", state_id.to_string())])
            .await?;
        Ok(envelope.data)
    }

    async fn update_family(&self, id: &str, update: &FamilyUpdate) -> Result<(), ApiError> {
        tracing::debug!("PATCH family/{id}");
        let response = self
            .http
            .patch(self.url(&format!("family/{id}")))
            .json(update)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve a single canned response; the handle yields the request head
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).to_string()
        });

        (address, handle)
    }

    #[test]
    fn test_url_joins_paths() {
        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/family/1"), "http://localhost:3000/api/family/1");
        assert_eq!(client.url("state"), "http://localhost:3000/api/state");
    }

    #[test]
    fn test_envelope_with_meta() {
        let json = r#"{"data": [{"_id": "a", "name": "Keluarga A"}], "meta": {"page": 2, "limit": 10, "total": 11}}"#;
        let envelope: Envelope<Vec<Family>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.meta.unwrap().page_count(), 2);
    }

    #[tokio::test]
    async fn test_list_states_sends_country_filter() {
        let (address, handle) =
            serve_once("200 OK", r#"{"data": [{"_id": 12, "name": "Sumatera Utara"}]}"#).await;
        let client = ApiClient::new(&address).unwrap();

        let states = client.list_states(102).await.unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].name, "Sumatera Utara");

        let request = handle.await.unwrap();
        assert!(request.starts_with("GET /state?country_id=102 "));
    }

    #[tokio::test]
    async fn test_list_cities_sends_state_filter() {
        let (address, handle) =
            serve_once("200 OK", r#"{"data": [{"_id": 1271, "name": "Kota Medan"}]}"#).await;
        let client = ApiClient::new(&address).unwrap();

        let cities = client.list_cities(12).await.unwrap();
        assert_eq!(cities[0].id, 1271);
        assert!(handle.await.unwrap().starts_with("GET /city?state_id=12 "));
    }

    #[tokio::test]
    async fn test_get_family_not_found() {
        let (address, _handle) = serve_once("404 Not Found", r#"{"message": "nope"}"#).await;
        let client = ApiClient::new(&address).unwrap();

        let err = client.get_family("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_keeps_body() {
        let (address, _handle) = serve_once("500 Internal Server Error", "boom").await;
        let client = ApiClient::new(&address).unwrap();

        match client.list_states(102).await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_families_without_meta() {
        let (address, handle) = serve_once(
            "200 OK",
            r#"{"data": [{"_id": "a", "name": "A"}, {"_id": "b", "name": "B"}]}"#,
        )
        .await;
        let client = ApiClient::new(&address).unwrap();

        let page = client.list_families(1, 20).await.unwrap();
        assert_eq!(page.families.len(), 2);
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.limit, 20);
        assert!(handle
            .await
            .unwrap()
            .starts_with("GET /family?page=1&limit=20 "));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = ApiClient::new(&address).unwrap();
        let err = client.list_cities(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
