// ABOUTME: HubSpot CRM provider implementation
// ABOUTME: Form-encoded token grants and cursor-paginated contact listing mapped to IntegrationItems

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use hubgate_auth::{AuthError, AuthResult, Credentials, Provider, ProviderConfig, TokenResponse};
use hubgate_core::IntegrationItem;

use crate::{LIST_TIMEOUT, PAGE_SIZE, TOKEN_TIMEOUT};

/// Base URL for contact links in the HubSpot UI.
const HUBSPOT_APP_URL: &str = "https://app.hubspot.com";

pub struct HubspotProvider {
    config: ProviderConfig,
    http: Client,
}

impl HubspotProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Both grants hit the same form-encoded token endpoint.
    async fn token_request(&self, params: &[(&str, &str)]) -> AuthResult<TokenResponse> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(params)
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
            .map_err(|e| AuthError::MalformedResponse(format!("hubspot token response: {}", e)))
    }
}

#[async_trait]
impl Provider for HubspotProvider {
    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn exchange_code(&self, code: &str) -> AuthResult<TokenResponse> {
        debug!("Exchanging HubSpot authorization code");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenResponse> {
        debug!("Refreshing HubSpot access token");
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn list_items(&self, credentials: &Credentials) -> AuthResult<Vec<IntegrationItem>> {
        let url = format!("{}/crm/v3/objects/contacts", self.config.api_base_url);
        let mut contacts: Vec<Contact> = Vec::new();
        let mut after: Option<String> = None;

        // Accumulate every page before mapping; any failure aborts the fetch.
        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&credentials.access_token)
                .query(&[("limit", PAGE_SIZE.to_string())])
                .timeout(LIST_TIMEOUT);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor)]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AuthError::provider(status.as_u16(), body));
            }

            let page: ContactsPage = response.json().await.map_err(|e| {
                AuthError::MalformedResponse(format!("hubspot contacts page: {}", e))
            })?;

            debug!("Fetched HubSpot contacts page ({} records)", page.results.len());
            contacts.extend(page.results);

            match page.paging.and_then(|p| p.next) {
                Some(next) => after = Some(next.after),
                None => break,
            }
        }

        Ok(contacts.into_iter().map(map_contact).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ContactsPage {
    #[serde(default)]
    results: Vec<Contact>,
    paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
struct Paging {
    next: Option<PagingNext>,
}

#[derive(Debug, Deserialize)]
struct PagingNext {
    after: String,
}

#[derive(Debug, Deserialize)]
struct Contact {
    id: String,
    #[serde(default)]
    properties: ContactProperties,
}

#[derive(Debug, Default, Deserialize)]
struct ContactProperties {
    firstname: Option<String>,
    lastname: Option<String>,
    company: Option<String>,
    createdate: Option<String>,
    lastmodifieddate: Option<String>,
}

/// Deterministic contact-to-item mapping: identifiers and timestamps copied
/// through, display name joined from the name properties, canonical URL
/// built from the contact id.
fn map_contact(contact: Contact) -> IntegrationItem {
    let properties = contact.properties;
    let name = format!(
        "{} {}",
        properties.firstname.as_deref().unwrap_or(""),
        properties.lastname.as_deref().unwrap_or("")
    )
    .trim()
    .to_string();

    let mut item = IntegrationItem::new(&contact.id, name, "contact");
    item.parent_path_or_name = properties.company;
    item.creation_time = parse_timestamp(properties.createdate.as_deref());
    item.last_modified_time = parse_timestamp(properties.lastmodifieddate.as_deref());
    item.url = Some(format!("{}/contacts/{}", HUBSPOT_APP_URL, contact.id));
    item
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
