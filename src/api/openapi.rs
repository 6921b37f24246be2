use super::handlers::{functions, health};
use crate::{
    error::ErrorDetail,
    functions::{ChallengeRequest, Event, OperationResult, ResultData, VerificationRequest},
    identity::{AuthResult, DeliveryMode},
};
use utoipa::OpenApi;

// Title, version, contact and license come from Cargo.toml.
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        functions::passwordless_auth_start,
        functions::passwordless_auth_login,
    ),
    components(schemas(
        Event,
        ChallengeRequest,
        VerificationRequest,
        DeliveryMode,
        OperationResult,
        ResultData,
        AuthResult,
        ErrorDetail,
        health::Health,
    )),
    tags(
        (name = "functions", description = "Passwordless one-time code functions"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
