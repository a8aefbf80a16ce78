//! Obtains an access token we can use to call the Calendar API.

use calendar_resource_core::{ResourceError, ResourceResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GoogleCredentials, GoogleSettings, OAuthClient, ServiceAccountKey};
use crate::types::TokenResponse;

pub const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Access a session is requested for. Only service-account tokens are
/// scoped per request; a refresh token carries the scopes it was issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    ReadOnly,
    ReadWrite,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ReadOnly => READONLY_SCOPE,
            Scope::ReadWrite => CALENDAR_SCOPE,
        }
    }
}

/// Claims of the signed assertion a service account trades for a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct Session {
    access_token: String,
}

impl Session {
    pub async fn establish(
        http: &reqwest::Client,
        settings: &GoogleSettings,
        creds: &GoogleCredentials,
        scope: Scope,
    ) -> ResourceResult<Self> {
        match creds {
            GoogleCredentials::ServiceAccount(key) => {
                Self::exchange_assertion(http, settings, key, scope).await
            }
            GoogleCredentials::OAuth(client) => {
                if let Some(token) = client.access_token.as_deref().filter(|t| !t.is_empty()) {
                    return Ok(Session {
                        access_token: token.to_string(),
                    });
                }
                Self::refresh(http, settings, client).await
            }
        }
    }

    async fn exchange_assertion(
        http: &reqwest::Client,
        settings: &GoogleSettings,
        key: &ServiceAccountKey,
        scope: Scope,
    ) -> ResourceResult<Self> {
        debug!(
            client_email = %key.client_email,
            scope = scope.as_str(),
            "exchanging service account assertion"
        );

        let assertion = sign_assertion(key, scope, &settings.token_url, Utc::now())?;
        Self::request_token(
            http,
            settings,
            &[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())],
        )
        .await
    }

    async fn refresh(
        http: &reqwest::Client,
        settings: &GoogleSettings,
        client: &OAuthClient,
    ) -> ResourceResult<Self> {
        debug!(token_url = %settings.token_url, "refreshing google access token");

        Self::request_token(
            http,
            settings,
            &[
                ("client_id", client.client_id.as_str()),
                ("client_secret", client.client_secret.as_str()),
                ("refresh_token", client.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ],
        )
        .await
    }

    async fn request_token(
        http: &reqwest::Client,
        settings: &GoogleSettings,
        form: &[(&str, &str)],
    ) -> ResourceResult<Self> {
        let response = http
            .post(&settings.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| ResourceError::Provider(format!("Failed to send token request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = format!("Failed to obtain google access token ({status}): {error_text}");
            // 4xx: the credentials were rejected
            return Err(if status.is_client_error() {
                ResourceError::Config(message)
            } else {
                ResourceError::Provider(message)
            });
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| ResourceError::Provider(format!("Failed to parse token response: {e}")))?;

        debug!(expires_in = tokens.expires_in, "google access token issued");

        Ok(Session {
            access_token: tokens.access_token,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// RS256 assertion for the JWT-bearer grant, valid for one hour from `now`.
/// `audience` is the token endpoint the assertion is posted to.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    scope: Scope,
    audience: &str,
    now: DateTime<Utc>,
) -> ResourceResult<String> {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: scope.as_str().to_string(),
        aud: audience.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(1)).timestamp(),
    };

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| ResourceError::Config(format!("Invalid service account private_key: {e}")))?;

    jsonwebtoken::encode(&header, &claims, &signing_key).map_err(|e| {
        ResourceError::Config(format!("Failed to sign service account assertion: {e}"))
    })
}
