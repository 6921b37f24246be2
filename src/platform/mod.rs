//! Backend platform GraphQL client.
//!
//! Only two operations are ever sent: a user count by email (as a system request) and a
//! sign-up with the caller's identity token.

pub mod graphql;

pub use graphql::{Operation, FIND_USER_BY_EMAIL, USER_SIGN_UP_WITH_TOKEN};

use crate::error::{remote_message, Error};
use crate::identity::response_body;
use anyhow::{anyhow, Context};
use reqwest::{header::AUTHORIZATION, Client};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use tracing::{debug, info_span, instrument, Instrument};
use url::Url;

/// Who a GraphQL request is made as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization<'a> {
    /// Internal system request with permission checks disabled; sends the platform API
    /// token when one is configured.
    System,
    /// On behalf of the holder of this bearer token
    Bearer(&'a str),
}

#[derive(Deserialize)]
struct UsersList {
    #[serde(rename = "usersList")]
    users_list: Count,
}

#[derive(Deserialize)]
struct Count {
    count: u64,
}

#[derive(Deserialize)]
struct SignUp {
    #[serde(rename = "userSignUpWithToken")]
    user_sign_up_with_token: Id,
}

#[derive(Deserialize)]
struct Id {
    id: String,
}

#[derive(Clone)]
pub struct PlatformClient {
    client: Client,
    url: Url,
    api_token: Option<SecretString>,
}

impl PlatformClient {
    /// # Errors
    /// Returns an error if the endpoint is not an http(s) URL or the HTTP client cannot be built.
    pub fn new(url: &str, api_token: Option<SecretString>) -> anyhow::Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid platform URL: {url}"))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Invalid platform URL: unsupported scheme {}",
                url.scheme()
            ));
        }

        let client = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            url,
            api_token,
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Number of users whose email equals `email` exactly.
    ///
    /// # Errors
    /// Returns an error if the request fails or the platform answers with errors.
    #[instrument(skip(self))]
    pub async fn count_users_by_email(&self, email: &str) -> Result<u64, Error> {
        let data: UsersList = self
            .request(
                &FIND_USER_BY_EMAIL,
                json!({ "email": email }),
                Authorization::System,
            )
            .await?;

        Ok(data.users_list.count)
    }

    /// Create a user for `email` under the given authentication profile, authorized by the
    /// user's own identity token. Returns the new user id.
    ///
    /// # Errors
    /// Returns an error if the request fails or the platform answers with errors.
    #[instrument(skip(self, id_token))]
    pub async fn user_sign_up_with_token(
        &self,
        auth_profile_id: &str,
        email: &str,
        id_token: &str,
    ) -> Result<String, Error> {
        let data: SignUp = self
            .request(
                &USER_SIGN_UP_WITH_TOKEN,
                json!({ "authProfileId": auth_profile_id, "email": email }),
                Authorization::Bearer(id_token),
            )
            .await?;

        Ok(data.user_sign_up_with_token.id)
    }

    /// Send one GraphQL operation and decode its `data`.
    ///
    /// # Errors
    /// Returns an error on transport failure, a non-success status, a non-empty `errors`
    /// array, or a `data` object that does not match `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Value,
        authorization: Authorization<'_>,
    ) -> Result<T, Error> {
        let payload = json!({
            "query": operation.query,
            "variables": variables,
        });

        let mut request = self.client.post(self.url.clone()).json(&payload);

        match authorization {
            Authorization::System => {
                if let Some(token) = &self.api_token {
                    request = request.header(
                        AUTHORIZATION,
                        format!("Bearer {}", token.expose_secret()),
                    );
                }
            }
            Authorization::Bearer(token) => {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let span = info_span!(
            "platform.graphql",
            http.method = "POST",
            url = %self.url,
            graphql.operation = operation.name
        );
        let response = request.send().instrument(span).await?;

        let status = response.status();
        let body = response_body(response).await?;

        if !status.is_success() {
            return Err(Error::Platform {
                status,
                message: remote_message(&body),
                body,
            });
        }

        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(Error::Graphql(errors.clone()));
            }
        }

        let data = body
            .get("data")
            .filter(|data| !data.is_null())
            .cloned()
            .ok_or_else(|| Error::InvalidResponse(format!("{}: no data", operation.name)))?;

        debug!("{} response: {}", operation.name, data);

        serde_json::from_value(data)
            .map_err(|e| Error::InvalidResponse(format!("{}: {e}", operation.name)))
    }
}

impl std::fmt::Debug for PlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformClient")
            .field("url", &self.url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .finish()
    }
}
