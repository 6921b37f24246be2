use crate::{
    error::Error,
    functions::{Event, Function, Functions, OperationResult},
};
use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::{error, instrument};

fn missing_payload(function: Function) -> Json<OperationResult> {
    let e = Error::InvalidRequest("missing or malformed JSON event".to_string());
    error!("{}: {}", function, e);
    Json(OperationResult::failure(&e))
}

#[utoipa::path(
    post,
    path = "/passwordlessAuthStart",
    request_body = Event,
    responses (
        (status = 200, description = "Envelope with `data.success`; failures are listed in `errors`", body = OperationResult, content_type = "application/json"),
    ),
    tag = "functions"
)]
#[instrument(skip(functions, payload))]
pub async fn passwordless_auth_start(
    functions: Extension<Arc<Functions>>,
    payload: Option<Json<Event>>,
) -> Json<OperationResult> {
    let Some(Json(event)) = payload else {
        return missing_payload(Function::Start);
    };

    Json(functions.start(event).await)
}

#[utoipa::path(
    post,
    path = "/passwordlessAuthLogin",
    request_body = Event,
    responses (
        (status = 200, description = "Envelope with `data.success` and `data.auth`; failures are listed in `errors`", body = OperationResult, content_type = "application/json"),
    ),
    tag = "functions"
)]
#[instrument(skip(functions, payload))]
pub async fn passwordless_auth_login(
    functions: Extension<Arc<Functions>>,
    payload: Option<Json<Event>>,
) -> Json<OperationResult> {
    let Some(Json(event)) = payload else {
        return missing_payload(Function::Login);
    };

    Json(functions.login(event).await)
}
