// ABOUTME: Notion workspace provider implementation
// ABOUTME: Basic-auth JSON token grants and cursor-paginated search mapped to IntegrationItems

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use hubgate_auth::{AuthError, AuthResult, Credentials, Provider, ProviderConfig, TokenResponse};
use hubgate_core::IntegrationItem;

use crate::{LIST_TIMEOUT, PAGE_SIZE, TOKEN_TIMEOUT};

/// API version header required on every Notion data request.
const NOTION_VERSION: &str = "2022-06-28";

pub struct NotionProvider {
    config: ProviderConfig,
    http: Client,
    basic_credential: String,
}

impl NotionProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let pair = format!("{}:{}", config.client_id, config.client_secret);
        Self {
            basic_credential: STANDARD.encode(pair),
            config,
            http: Client::new(),
        }
    }

    /// Notion authenticates token grants with the Basic client pair and a
    /// JSON body, unlike the form-encoded default most providers use.
    async fn token_request(&self, body: Value) -> AuthResult<TokenResponse> {
        let response = self
            .http
            .post(&self.config.token_url)
            .header("Authorization", format!("Basic {}", self.basic_credential))
            .json(&body)
            .timeout(TOKEN_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::provider(status.as_u16(), body));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AuthError::MalformedResponse(format!("notion token response: {}", e)))
    }
}

#[async_trait]
impl Provider for NotionProvider {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn authorize_extra_params(&self) -> Vec<(&'static str, &'static str)> {
        vec![("owner", "user")]
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse> {
        debug!("Exchanging Notion authorization code");
        self.token_request(json!({
            "grant_type": "authorization_code",
            "code": code,
            "redirect_uri": self.config.redirect_uri,
        }))
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenResponse> {
        debug!("Refreshing Notion access token");
        self.token_request(json!({
            "grant_type": "refresh_token",
            "refresh_token": refresh_token,
        }))
        .await
    }

    async fn list_items(&self, credentials: &Credentials) -> AuthResult<Vec<IntegrationItem>> {
        let url = format!("{}/v1/search", self.config.api_base_url);
        let mut results: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": PAGE_SIZE });
            if let Some(start_cursor) = &cursor {
                body["start_cursor"] = json!(start_cursor);
            }

            let response = self
                .http
                .post(&url)
                .bearer_auth(&credentials.access_token)
                .header("Notion-Version", NOTION_VERSION)
                .json(&body)
                .timeout(LIST_TIMEOUT)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::provider(status.as_u16(), body));
            }

            let page: SearchPage = response.json().await.map_err(|e| {
                AuthError::MalformedResponse(format!("notion search page: {}", e))
            })?;

            debug!("Fetched Notion search page ({} records)", page.results.len());
            results.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(results.iter().map(map_object).collect())
    }
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

/// Deterministic object-to-item mapping. Search results are heterogeneous
/// (pages and databases carry titles in different places), so mapping works
/// on the raw JSON with fixed extraction rules.
fn map_object(object: &Value) -> IntegrationItem {
    let id = object["id"].as_str().unwrap_or_default().to_string();
    let object_kind = object["object"].as_str().unwrap_or("unknown").to_string();

    let mut item = IntegrationItem::new(id, extract_title(object), &object_kind);
    item.directory = object_kind == "database";
    item.creation_time = parse_timestamp(object["created_time"].as_str());
    item.last_modified_time = parse_timestamp(object["last_edited_time"].as_str());
    item.parent_id = object["parent"]["database_id"]
        .as_str()
        .or_else(|| object["parent"]["page_id"].as_str())
        .map(String::from);
    item.url = object["url"].as_str().map(String::from);
    item
}

/// Title lives at `title[0].text.content` for databases and under the
/// title property for pages; fall back to "Untitled" like the Notion UI.
fn extract_title(object: &Value) -> String {
    let fragments = object["title"]
        .as_array()
        .or_else(|| object["properties"]["title"]["title"].as_array());

    fragments
        .and_then(|parts| parts.first())
        .and_then(|part| {
            part["plain_text"]
                .as_str()
                .or_else(|| part["text"]["content"].as_str())
        })
        .unwrap_or("Untitled")
        .to_string()
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubgate_auth::{CredentialPolicy, ProviderKind};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn config(base: &str) -> ProviderConfig {
        ProviderConfig {
            kind: ProviderKind::Notion,
            auth_url: format!("{}/v1/oauth/authorize", base),
            token_url: format!("{}/v1/oauth/token", base),
            api_base_url: base.to_string(),
            client_id: "notion-client".to_string(),
            client_secret: "notion-secret".to_string(),
            redirect_uri: "http://localhost:8000/integrations/notion/callback".to_string(),
            scopes: vec![],
            credential_policy: CredentialPolicy::SingleUse,
        }
    }

    fn credentials() -> Credentials {
        Credentials::from_response(
            serde_json::from_value(json!({ "access_token": "notion-access" })).unwrap(),
        )
    }

    fn page_object(id: usize) -> Value {
        json!({
            "object": "page",
            "id": format!("page-{id}"),
            "created_time": "2024-03-01T10:00:00.000Z",
            "last_edited_time": "2024-03-02T10:00:00.000Z",
            "parent": { "database_id": "db-1" },
            "url": format!("https://www.notion.so/page-{id}"),
            "properties": {
                "title": { "title": [{ "plain_text": format!("Page {id}") }] }
            }
        })
    }

    fn search_page(ids: std::ops::Range<usize>, next_cursor: Option<&str>) -> Value {
        json!({
            "results": ids.map(page_object).collect::<Vec<_>>(),
            "has_more": next_cursor.is_some(),
            "next_cursor": next_cursor,
        })
    }

    fn body_cursor(request: &Request) -> Option<String> {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or_default();
        body["start_cursor"].as_str().map(String::from)
    }

    #[test]
    fn test_map_database_object() {
        let raw = json!({
            "object": "database",
            "id": "db-9",
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-01-02T00:00:00.000Z",
            "title": [{ "text": { "content": "Employees" } }],
            "url": "https://www.notion.so/db-9",
        });

        let item = map_object(&raw);
        assert_eq!(item.id, "db-9");
        assert_eq!(item.name, "Employees");
        assert_eq!(item.item_type, "database");
        assert!(item.directory);
        assert_eq!(item.url, Some("https://www.notion.so/db-9".to_string()));
        assert_eq!(item.parent_id, None);
    }

    #[test]
    fn test_map_page_object_with_parent() {
        let item = map_object(&page_object(3));

        assert_eq!(item.id, "page-3");
        assert_eq!(item.name, "Page 3");
        assert_eq!(item.item_type, "page");
        assert!(!item.directory);
        assert_eq!(item.parent_id, Some("db-1".to_string()));
    }

    #[test]
    fn test_map_untitled_object() {
        let item = map_object(&json!({ "object": "page", "id": "p" }));
        assert_eq!(item.name, "Untitled");
    }

    #[tokio::test]
    async fn test_exchange_code_uses_basic_client_pair() {
        let server = MockServer::start().await;
        let expected = STANDARD.encode("notion-client:notion-secret");

        Mock::given(method("POST"))
            .and(path("/v1/oauth/token"))
            .and(header("Authorization", format!("Basic {expected}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "workspace-token",
                "token_type": "bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = NotionProvider::new(config(&server.uri()));
        let response = provider.exchange_code("code-1").await.unwrap();

        assert_eq!(response.access_token, "workspace-token");
        assert_eq!(response.expires_in, None);
        assert_eq!(response.refresh_token, None);
    }

    #[tokio::test]
    async fn test_exchange_rejection_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&server)
            .await;

        let provider = NotionProvider::new(config(&server.uri()));
        let err = provider.exchange_code("bad").await.unwrap_err();

        assert!(matches!(err, AuthError::Provider { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_list_items_follows_cursor_to_exhaustion() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .and(header("Notion-Version", NOTION_VERSION))
            .respond_with(move |request: &Request| {
                let page = match body_cursor(request).as_deref() {
                    None => search_page(0..100, Some("c1")),
                    Some("c1") => search_page(100..200, Some("c2")),
                    Some("c2") => search_page(200..242, None),
                    Some(other) => panic!("unexpected cursor {other}"),
                };
                ResponseTemplate::new(200).set_body_json(page)
            })
            .expect(3)
            .mount(&server)
            .await;

        let provider = NotionProvider::new(config(&server.uri()));
        let items = provider.list_items(&credentials()).await.unwrap();

        assert_eq!(items.len(), 242);
        assert_eq!(items[0].id, "page-0");
        assert_eq!(items[241].id, "page-241");
    }

    #[tokio::test]
    async fn test_list_items_aborts_on_second_page_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/search"))
            .respond_with(move |request: &Request| {
                match body_cursor(request) {
                    None => ResponseTemplate::new(200).set_body_json(search_page(0..100, Some("c1"))),
                    Some(_) => ResponseTemplate::new(502).set_body_string("bad gateway"),
                }
            })
            .mount(&server)
            .await;

        let provider = NotionProvider::new(config(&server.uri()));
        let err = provider.list_items(&credentials()).await.unwrap_err();

        assert!(matches!(err, AuthError::Provider { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_authorize_url_carries_owner_param() {
        let provider = NotionProvider::new(config("https://api.notion.example"));
        let url = provider.authorize_url("s").unwrap();

        assert!(url.contains("owner=user"));
        assert!(url.contains("response_type=code"));
    }
}
