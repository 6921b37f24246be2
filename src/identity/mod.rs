//! Identity provider client.
//!
//! Two stateless calls against the provider's passwordless API: start a challenge
//! (`/passwordless/start`) and exchange the delivered code for tokens (`/oauth/token`).

use crate::error::{remote_message, Error};
use anyhow::{anyhow, Context};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info_span, instrument, Instrument};
use url::Url;
use utoipa::ToSchema;

pub const PASSWORDLESS_OTP_GRANT: &str = "http://auth0.com/oauth/grant-type/passwordless/otp";

// Used both as the passwordless connection and as the token realm.
const EMAIL_CONNECTION: &str = "email";

const START_PATH: &str = "passwordless/start";
const TOKEN_PATH: &str = "oauth/token";

/// How the provider delivers the challenge.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// A one-time code typed back by the user
    #[default]
    Code,
    /// A magic link
    Link,
}

impl DeliveryMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Link => "link",
        }
    }
}

/// Tokens returned by a successful code verification.
#[derive(ToSchema, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AuthResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl AuthResult {
    /// The identity token, used as bearer credential for the platform.
    ///
    /// # Errors
    /// Returns an error if the provider did not issue an `id_token`.
    pub fn id_token(&self) -> Result<&str, Error> {
        self.id_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::InvalidResponse("no id_token in verification result".to_string()))
    }
}

impl std::fmt::Debug for AuthResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "***");
        f.debug_struct("AuthResult")
            .field("id_token", &redact(&self.id_token))
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Build the provider base URL from the configured domain.
///
/// A bare host implies `https`; a value with an explicit `http(s)://` scheme is kept.
///
/// # Errors
/// Returns an error if the domain cannot be parsed into a URL with a host.
pub fn base_url(domain: &str) -> anyhow::Result<Url> {
    let domain = domain.trim().trim_end_matches('/');

    let raw = if domain.starts_with("http://") || domain.starts_with("https://") {
        format!("{domain}/")
    } else {
        format!("https://{domain}/")
    };

    let url = Url::parse(&raw).with_context(|| format!("Invalid identity provider domain: {domain}"))?;

    if url.host_str().is_none() {
        return Err(anyhow!("Identity provider domain has no host: {domain}"));
    }

    Ok(url)
}

#[derive(Clone)]
pub struct IdentityClient {
    client: Client,
    base_url: Url,
    start_url: Url,
    token_url: Url,
    client_id: String,
    client_secret: SecretString,
}

impl IdentityClient {
    /// # Errors
    /// Returns an error if the domain is invalid or the HTTP client cannot be built.
    pub fn new(domain: &str, client_id: String, client_secret: SecretString) -> anyhow::Result<Self> {
        let client = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;
        let base_url = base_url(domain)?;
        let start_url = base_url.join(START_PATH)?;
        let token_url = base_url.join(TOKEN_PATH)?;

        Ok(Self {
            client,
            base_url,
            start_url,
            token_url,
            client_id,
            client_secret,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Start the passwordless flow by sending the user a code or a link.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self))]
    pub async fn otp_start(&self, email: &str, send: DeliveryMode) -> Result<(), Error> {
        let payload = json!({
            "connection": EMAIL_CONNECTION,
            "client_id": self.client_id,
            "client_secret": self.client_secret.expose_secret(),
            "email": email,
            "send": send.as_str(),
        });

        let response = self.post(&self.start_url, &payload).await?;

        debug!("passwordless challenge started: {}", response);

        Ok(())
    }

    /// Verify a delivered code for the given username (email).
    ///
    /// # Errors
    /// Returns an error if the request fails, the provider rejects the code, or the
    /// response cannot be decoded.
    #[instrument(skip(self, otp))]
    pub async fn token_verify(&self, username: &str, otp: &str) -> Result<AuthResult, Error> {
        let payload = json!({
            "grant_type": PASSWORDLESS_OTP_GRANT,
            "realm": EMAIL_CONNECTION,
            "client_id": self.client_id,
            "client_secret": self.client_secret.expose_secret(),
            "username": username,
            "otp": otp,
        });

        let response = self.post(&self.token_url, &payload).await?;

        serde_json::from_value(response)
            .map_err(|e| Error::InvalidResponse(format!("token response: {e}")))
    }

    async fn post(&self, url: &Url, payload: &Value) -> Result<Value, Error> {
        let span = info_span!(
            "identity.request",
            http.method = "POST",
            url = %url
        );
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        let body = response_body(response).await?;

        if !status.is_success() {
            return Err(Error::IdentityProvider {
                endpoint: url.path().to_string(),
                status,
                message: remote_message(&body),
                body,
            });
        }

        Ok(body)
    }
}

impl std::fmt::Debug for IdentityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityClient")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Read a response body as JSON, keeping non-JSON bodies as a string.
pub(crate) async fn response_body(response: reqwest::Response) -> Result<Value, Error> {
    let text = response.text().await?;

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
