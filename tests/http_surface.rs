//! HTTP surface tests for the passwordless functions.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`, while the identity
//! provider and the platform GraphQL endpoint are served by `wiremock`.

use anyhow::{Context as _, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use passwordless::{
    api,
    functions::{Context, Functions},
    identity::IdentityClient,
    platform::PlatformClient,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::{
    matchers::{body_partial_json, header as header_eq, method, path},
    Mock, MockServer, ResponseTemplate,
};

const EMAIL: &str = "jane@example.com";

fn app(idp: &MockServer, platform: &MockServer) -> Result<Router> {
    let identity = IdentityClient::new(
        &idp.uri(),
        "client-id".to_string(),
        SecretString::from("client-secret".to_string()),
    )?;
    let platform = PlatformClient::new(
        &format!("{}/graphql", platform.uri()),
        Some(SecretString::from("workspace-token".to_string())),
    )?;

    Ok(api::app(Functions::new(
        identity,
        Context { platform },
        "ckauthprofile".to_string(),
    )))
}

fn post(uri: &str, body: &str) -> Result<Request<Body>> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .context("Failed to build request")
}

async fn json_body(response: axum::response::Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    serde_json::from_slice(&bytes).context("Response body is not JSON")
}

#[tokio::test]
async fn health_reports_package() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    let response = app(&idp, &platform)?
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers().contains_key("x-app"));

    let body = json_body(response).await?;
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn request_id_is_propagated() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    let response = app(&idp, &platform)?
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "01HZY3Q4Z0000000000000000")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("01HZY3Q4Z0000000000000000")
    );
    Ok(())
}

#[tokio::test]
async fn start_sends_challenge() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/passwordless/start"))
        .and(body_partial_json(json!({
            "connection": "email",
            "email": EMAIL,
            "send": "link"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "abc"})))
        .expect(1)
        .mount(&idp)
        .await;

    let response = app(&idp, &platform)?
        .oneshot(post(
            "/passwordlessAuthStart",
            &json!({"data": {"email": EMAIL, "type": "link"}}).to_string(),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?, json!({"data": {"success": true}}));
    Ok(())
}

#[tokio::test]
async fn start_reports_provider_rejection() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/passwordless/start"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "bad.email",
            "error_description": "error in email - email format validation failed"
        })))
        .expect(1)
        .mount(&idp)
        .await;

    let response = app(&idp, &platform)?
        .oneshot(post(
            "/passwordlessAuthStart",
            &json!({"data": {"email": "not-an-email"}}).to_string(),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["errors"][0]["code"], "identity_provider");
    assert_eq!(body["errors"][0]["status"], 400);
    Ok(())
}

#[tokio::test]
async fn login_returns_tokens_and_signs_up_match() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_partial_json(json!({
            "grant_type": "http://auth0.com/oauth/grant-type/passwordless/otp",
            "realm": "email",
            "username": EMAIL,
            "otp": "123456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "id_token": "id.token.value",
            "expires_in": 86400,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&idp)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header_eq("authorization", "Bearer workspace-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"usersList": {"count": 1}}
        })))
        .expect(1)
        .mount(&platform)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header_eq("authorization", "Bearer id.token.value"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"userSignUpWithToken": {"id": "ckuser1"}}
        })))
        .expect(1)
        .mount(&platform)
        .await;

    let response = app(&idp, &platform)?
        .oneshot(post(
            "/passwordlessAuthLogin",
            &json!({"data": {"email": EMAIL, "code": "123456"}}).to_string(),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["auth"]["id_token"], "id.token.value");
    assert_eq!(body["data"]["auth"]["expires_in"], 86400);
    assert!(body.get("errors").is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_an_envelope() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    let response = app(&idp, &platform)?
        .oneshot(post("/passwordlessAuthLogin", "{not json")?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["errors"][0]["code"], "invalid_request");

    assert!(idp.received_requests().await.unwrap_or_default().is_empty());
    assert!(platform.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_field_is_an_envelope() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    let response = app(&idp, &platform)?
        .oneshot(post(
            "/passwordlessAuthStart",
            &json!({"data": {"type": "code"}}).to_string(),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["success"], false);
    assert_eq!(body["errors"][0]["code"], "invalid_request");
    assert!(idp.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let idp = MockServer::start().await;
    let platform = MockServer::start().await;

    let response = app(&idp, &platform)?
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["paths"]["/passwordlessAuthStart"]["post"].is_object());
    assert!(body["paths"]["/passwordlessAuthLogin"]["post"].is_object());
    Ok(())
}
