use super::{Event, Function, OperationResult};
use crate::identity::{DeliveryMode, IdentityClient};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use utoipa::ToSchema;

/// Input of `passwordlessAuthStart`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub email: String,
    #[serde(default, rename = "type", alias = "deliveryMode")]
    pub delivery_mode: DeliveryMode,
}

/// Ask the identity provider to deliver a one-time code (or link) to the email.
///
/// Every call triggers a new delivery; nothing is deduplicated.
#[instrument(skip(identity, event))]
pub async fn passwordless_auth_start(identity: &IdentityClient, event: &Event) -> OperationResult {
    let request: ChallengeRequest = match event.parse() {
        Ok(request) => request,
        Err(e) => {
            error!("{}: {}", Function::Start, e);
            return OperationResult::failure(&e);
        }
    };

    match identity
        .otp_start(&request.email, request.delivery_mode)
        .await
    {
        Ok(()) => {
            info!(
                "{} challenge sent to {}",
                request.delivery_mode.as_str(),
                request.email
            );
            OperationResult::success(None)
        }
        Err(e) => {
            error!("{}: {}", Function::Start, e);
            OperationResult::failure(&e)
        }
    }
}
