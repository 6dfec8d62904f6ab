//! Remote calendar provider client (OAuth2 + REST)

use std::sync::Arc;

use async_trait::async_trait;
use calsync_common::auth::{clear_credential, load_access_token, store_credential, PKCEChallenge};
use calsync_common::security::SecretStore;
use calsync_core::CalendarProvider;
use calsync_domain::{
    CalSyncError, CalendarInfo, Event, ProviderKind, RemoteCalendarConfig, Result, UpdateOutcome,
};
use chrono_tz::Tz;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::oauth::{authorization_url, exchange_code, parse_callback};
use super::session::{AuthorizationSession, SessionOutcome};
use super::types::{CalendarListResponse, CreatedEvent, EventResource};
use crate::errors::InfraError;

/// Source label used when the account has no primary calendar entry.
const FALLBACK_SOURCE: &str = "Remote Calendar";

/// REST calendar client authorized through OAuth2 + PKCE.
///
/// Tokens are never cached: each request reads the access token from the
/// secret store, so a sign-out is visible to the very next call.
pub struct RemoteCalendarProvider {
    config: RemoteCalendarConfig,
    http: Client,
    secrets: Arc<dyn SecretStore>,
    session: Arc<dyn AuthorizationSession>,
    tz: Tz,
    auth_gate: Mutex<()>,
}

impl RemoteCalendarProvider {
    pub fn new(
        config: RemoteCalendarConfig,
        secrets: Arc<dyn SecretStore>,
        session: Arc<dyn AuthorizationSession>,
        tz: Tz,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(InfraError::from)?;
        Ok(Self { config, http, secrets, session, tz, auth_gate: Mutex::new(()) })
    }

    /// Run the full authorization code + PKCE flow and persist the tokens.
    ///
    /// Only one flow may run at a time; a concurrent call fails with
    /// `AuthenticationFailed` instead of opening a second browser session.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<()> {
        let Ok(_guard) = self.auth_gate.try_lock() else {
            return Err(CalSyncError::AuthenticationFailed(
                "An authorization session is already in progress".to_string(),
            ));
        };

        let pkce = PKCEChallenge::generate();
        let auth_url = authorization_url(&self.config, &pkce)?;
        let redirect_uri = Url::parse(&self.config.redirect_uri).map_err(InfraError::from)?;

        let callback = match self.session.present(&auth_url, &redirect_uri).await? {
            SessionOutcome::Callback(url) => url,
            SessionOutcome::Cancelled => {
                return Err(CalSyncError::AuthenticationFailed(
                    "Authorization was cancelled".to_string(),
                ));
            }
            SessionOutcome::TimedOut => {
                return Err(CalSyncError::AuthenticationFailed(
                    "Authorization timed out".to_string(),
                ));
            }
        };

        let code = parse_callback(&callback, &pkce.state)?;
        let tokens = exchange_code(&self.http, &self.config, &code, &pkce.code_verifier).await?;
        store_credential(self.secrets.as_ref(), &self.config.credential_namespace, &tokens.into())
            .await?;

        info!("Remote calendar authorized");
        Ok(())
    }

    async fn access_token(&self) -> Result<String> {
        load_access_token(self.secrets.as_ref(), &self.config.credential_namespace)
            .await?
            .ok_or_else(|| {
                CalSyncError::AuthenticationFailed("Not signed in to remote calendar".to_string())
            })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut path = self.config.api_base_url.trim_end_matches('/').to_string();
        for segment in segments {
            path.push('/');
            path.push_str(segment);
        }
        Url::parse(&path).map_err(|err| InfraError::from(err).into())
    }

    fn events_url(&self, calendar_id: &str, event_id: Option<&str>) -> Result<Url> {
        let calendar = urlencoding::encode(calendar_id);
        match event_id {
            Some(event_id) => {
                let event = urlencoding::encode(event_id);
                self.endpoint(&["calendars", &calendar, "events", &event])
            }
            None => self.endpoint(&["calendars", &calendar, "events"]),
        }
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(InfraError::from)?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(CalSyncError::AuthenticationFailed(
                "Remote calendar rejected the access token".to_string(),
            ));
        }
        Ok(response)
    }

    async fn write_failure(response: Response, action: &str) -> CalSyncError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        CalSyncError::EventCreationFailed(format!("Failed to {action} event ({status}): {body}"))
    }

    async fn insert(&self, event: &Event, calendar_id: &str, include: bool) -> Result<String> {
        let body = EventResource::from_event(event, include, self.tz);
        let url = self.events_url(calendar_id, None)?;
        let response = Self::send(self.request(Method::POST, url).await?.json(&body)).await?;

        if !response.status().is_success() {
            return Err(Self::write_failure(response, "create").await);
        }

        let created: CreatedEvent = response.json().await.map_err(InfraError::from)?;
        Ok(created.id)
    }
}

#[async_trait]
impl CalendarProvider for RemoteCalendarProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Remote
    }

    async fn request_access(&self) -> Result<()> {
        self.authenticate().await
    }

    async fn is_authenticated(&self) -> bool {
        match load_access_token(self.secrets.as_ref(), &self.config.credential_namespace).await {
            Ok(token) => token.is_some(),
            Err(err) => {
                warn!(error = %err, "Failed to read remote calendar credentials");
                false
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let response = Self::send(self.request(Method::GET, url).await?).await?;
        let response = response.error_for_status().map_err(InfraError::from)?;
        let list: CalendarListResponse = response.json().await.map_err(InfraError::from)?;

        let source = list
            .items
            .iter()
            .find(|entry| entry.primary)
            .map_or_else(|| FALLBACK_SOURCE.to_string(), |entry| entry.id.clone());

        let calendars: Vec<CalendarInfo> = list
            .items
            .into_iter()
            .filter(|entry| entry.is_writable())
            .map(|entry| CalendarInfo {
                title: entry.title(),
                source: source.clone(),
                color: entry.background_color.clone(),
                provider: ProviderKind::Remote,
                allows_modification: true,
                id: entry.id,
            })
            .collect();

        debug!(count = calendars.len(), "Listed writable remote calendars");
        Ok(calendars)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create_event(
        &self,
        event: &Event,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<String> {
        self.insert(event, calendar_id, include_source_links).await
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update_event(
        &self,
        event: &Event,
        remote_id: &str,
        calendar_id: &str,
        include_source_links: bool,
    ) -> Result<UpdateOutcome> {
        let body = EventResource::from_event(event, include_source_links, self.tz);
        let url = self.events_url(calendar_id, Some(remote_id))?;
        let response = Self::send(self.request(Method::PUT, url).await?.json(&body)).await?;

        match response.status() {
            status if status.is_success() => Ok(UpdateOutcome::Updated),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                info!("Remote event vanished, recreating");
                let new_id = self.insert(event, calendar_id, include_source_links).await?;
                Ok(UpdateOutcome::Recreated(new_id))
            }
            _ => Err(Self::write_failure(response, "update").await),
        }
    }

    #[instrument(skip(self))]
    async fn delete_event(&self, remote_id: &str, calendar_id: Option<&str>) -> Result<()> {
        let calendar_id = calendar_id.ok_or_else(|| {
            CalSyncError::CalendarNotFound("No calendar selected for remote delete".to_string())
        })?;
        let url = self.events_url(calendar_id, Some(remote_id))?;
        let response = Self::send(self.request(Method::DELETE, url).await?).await?;

        if response.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(Self::write_failure(response, "delete").await)
        }
    }

    async fn sign_out(&self) -> Result<()> {
        clear_credential(self.secrets.as_ref(), &self.config.credential_namespace).await?;
        info!("Signed out of remote calendar");
        Ok(())
    }
}
