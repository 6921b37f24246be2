use super::{Context, Event, Function, OperationResult};
use crate::{
    error::Error,
    identity::{AuthResult, IdentityClient},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

/// Input of `passwordlessAuthLogin`.
#[derive(ToSchema, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub email: String,
    pub code: String,
}

impl std::fmt::Debug for VerificationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationRequest")
            .field("email", &self.email)
            .field("code", &"***")
            .finish()
    }
}

/// Verify the code, then look the user up on the platform and sign them up with the
/// issued identity token when the lookup matched.
///
/// A failed verification stops the flow before any platform call.
#[instrument(skip(identity, context, auth_profile_id, event))]
pub async fn passwordless_auth_login(
    identity: &IdentityClient,
    context: &Context,
    auth_profile_id: &str,
    event: &Event,
) -> OperationResult {
    let result = match event.parse::<VerificationRequest>() {
        Ok(request) => login(identity, context, auth_profile_id, &request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(auth) => OperationResult::success(Some(auth)),
        Err(e) => {
            error!("{}: {}", Function::Login, e);
            OperationResult::failure(&e)
        }
    }
}

async fn login(
    identity: &IdentityClient,
    context: &Context,
    auth_profile_id: &str,
    request: &VerificationRequest,
) -> Result<AuthResult, Error> {
    let auth = identity.token_verify(&request.email, &request.code).await?;

    let count = context
        .platform
        .count_users_by_email(&request.email)
        .await?;

    debug!("users matching {}: {}", request.email, count);

    // Sign-up runs only when the lookup found a match.
    if count > 0 {
        let id = context
            .platform
            .user_sign_up_with_token(auth_profile_id, &request.email, auth.id_token()?)
            .await?;

        info!("signed up user {} for {}", id, request.email);
    }

    Ok(auth)
}
