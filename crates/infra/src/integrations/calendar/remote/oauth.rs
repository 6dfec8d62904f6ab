//! OAuth 2.0 authorization code + PKCE flow for the remote calendar
//!
//! Builds the authorization URL, validates the redirect callback and
//! exchanges the code at the token endpoint. The interactive part is
//! delegated to an [`AuthorizationSession`](super::session::AuthorizationSession).

use std::collections::HashMap;

use calsync_common::auth::{PKCEChallenge, TokenResponse};
use calsync_domain::{CalSyncError, RemoteCalendarConfig, Result};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::errors::InfraError;

/// Authorization request URL for one login attempt
pub fn authorization_url(config: &RemoteCalendarConfig, pkce: &PKCEChallenge) -> Result<Url> {
    let mut url = Url::parse(&config.authorization_endpoint).map_err(InfraError::from)?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope_string())
        .append_pair("code_challenge", &pkce.code_challenge)
        .append_pair("code_challenge_method", pkce.challenge_method())
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("state", &pkce.state);
    Ok(url)
}

/// Extract the authorization code from the redirect callback.
///
/// # Errors
/// `AuthenticationFailed` when the provider returned `error=`, the state
/// does not match, or no code is present.
pub fn parse_callback(callback: &Url, expected_state: &str) -> Result<String> {
    let params: HashMap<String, String> = callback.query_pairs().into_owned().collect();

    if let Some(error) = params.get("error") {
        let detail = params.get("error_description").map_or("", String::as_str);
        return Err(CalSyncError::AuthenticationFailed(format!(
            "Authorization denied: {error} {detail}"
        )
        .trim_end()
        .to_string()));
    }

    if params.get("state").map(String::as_str) != Some(expected_state) {
        warn!("OAuth callback state mismatch");
        return Err(CalSyncError::AuthenticationFailed(
            "Authorization state mismatch".to_string(),
        ));
    }

    params
        .get("code")
        .filter(|code| !code.is_empty())
        .cloned()
        .ok_or_else(|| {
            CalSyncError::AuthenticationFailed("No authorization code in callback".to_string())
        })
}

/// Exchange an authorization code for tokens.
pub async fn exchange_code(
    http: &Client,
    config: &RemoteCalendarConfig,
    code: &str,
    code_verifier: &str,
) -> Result<TokenResponse> {
    debug!(endpoint = %config.token_endpoint, "Exchanging authorization code");

    let response = http
        .post(&config.token_endpoint)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
            ("code_verifier", code_verifier),
        ])
        .send()
        .await
        .map_err(InfraError::from)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CalSyncError::AuthenticationFailed(format!(
            "Token exchange failed ({status}): {body}"
        )));
    }

    response.json::<TokenResponse>().await.map_err(|err| {
        CalSyncError::AuthenticationFailed(format!("Invalid token response: {err}"))
    })
}
