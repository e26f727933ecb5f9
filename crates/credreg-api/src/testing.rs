//! Shared helpers for router tests.

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;

use credreg_core::Identity;

use crate::auth::CALLER_IDENTITY_HEADER;
use crate::state::{AppConfig, AppState};

pub const ADMIN: &str = "0x00000000000000000000000000000000000000aa";
pub const ISSUER: &str = "0x00000000000000000000000000000000000000bb";
pub const OTHER_ISSUER: &str = "0x00000000000000000000000000000000000000cc";
pub const HOLDER: &str = "0x00000000000000000000000000000000000000dd";

pub fn identity(s: &str) -> Identity {
    Identity::parse(s).unwrap()
}

/// Full application router in development-mode auth.
pub fn test_app() -> Router {
    crate::app(AppState::new(AppConfig::new(identity(ADMIN))))
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A JSON request sent as `caller` (anonymous when `None`).
pub fn json_as(method: &str, uri: &str, caller: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(caller) = caller {
        builder = builder.header(CALLER_IDENTITY_HEADER, caller);
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn delete_as(uri: &str, caller: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(CALLER_IDENTITY_HEADER, caller)
        .body(Body::empty())
        .unwrap()
}
