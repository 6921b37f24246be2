//! The two passwordless functions and their invocation envelope.
//!
//! Every function takes an [`Event`] whose `data` is decoded into the function's typed
//! request, and always returns an [`OperationResult`]; failures are logged and folded into
//! the envelope's `errors` array.

pub mod login;
pub mod start;

pub use login::{passwordless_auth_login, VerificationRequest};
pub use start::{passwordless_auth_start, ChallengeRequest};

use crate::{
    cli::globals::GlobalArgs,
    error::{Error, ErrorDetail},
    identity::{AuthResult, IdentityClient},
    platform::PlatformClient,
};
use anyhow::Context as _;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// An invocation event; `data` carries the function's input.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub data: Value,
}

impl Event {
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// Decode `data` into a typed request.
    ///
    /// # Errors
    /// Returns [`Error::InvalidRequest`] if `data` does not have the expected shape.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.data.clone()).map_err(|e| Error::InvalidRequest(e.to_string()))
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResultData {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthResult>,
}

/// Uniform response of both functions.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OperationResult {
    pub data: ResultData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorDetail>,
}

impl OperationResult {
    #[must_use]
    pub fn success(auth: Option<AuthResult>) -> Self {
        Self {
            data: ResultData {
                success: true,
                auth,
            },
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn failure(error: &Error) -> Self {
        Self {
            data: ResultData::default(),
            errors: vec![ErrorDetail::from(error)],
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.data.success
    }
}

/// Host-provided collaborators available to a function.
#[derive(Debug, Clone)]
pub struct Context {
    pub platform: PlatformClient,
}

/// Function names as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Start,
    Login,
}

impl Function {
    pub const ALL: [Self; 2] = [Self::Start, Self::Login];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "passwordlessAuthStart",
            Self::Login => "passwordlessAuthLogin",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| format!("unknown function: {s}"))
    }
}

/// Runtime for both functions, built once from the configuration and shared across
/// invocations.
#[derive(Debug, Clone)]
pub struct Functions {
    identity: IdentityClient,
    context: Context,
    auth_profile_id: String,
}

impl Functions {
    #[must_use]
    pub fn new(identity: IdentityClient, context: Context, auth_profile_id: String) -> Self {
        Self {
            identity,
            context,
            auth_profile_id,
        }
    }

    /// # Errors
    /// Returns an error if the identity provider domain or platform URL is invalid.
    pub fn from_globals(globals: &GlobalArgs) -> anyhow::Result<Self> {
        let identity = IdentityClient::new(
            &globals.idp_domain,
            globals.idp_client_id.clone(),
            globals.idp_client_secret.clone(),
        )
        .context("Failed to build identity provider client")?;

        let platform = PlatformClient::new(&globals.platform_url, globals.platform_token.clone())
            .context("Failed to build platform client")?;

        Ok(Self::new(
            identity,
            Context { platform },
            globals.auth_profile_id.clone(),
        ))
    }

    pub async fn invoke(&self, function: Function, event: Event) -> OperationResult {
        match function {
            Function::Start => self.start(event).await,
            Function::Login => self.login(event).await,
        }
    }

    pub async fn start(&self, event: Event) -> OperationResult {
        passwordless_auth_start(&self.identity, &event).await
    }

    pub async fn login(&self, event: Event) -> OperationResult {
        passwordless_auth_login(&self.identity, &self.context, &self.auth_profile_id, &event).await
    }
}
