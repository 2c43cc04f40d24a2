//! Shared helpers for in-process HTTP tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use spendwise_api::{AppState, create_router};
use spendwise_db::DocumentStore;
use spendwise_shared::{EmailConfig, EmailService, JwtConfig, JwtService};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<DocumentStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response body should be JSON")
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(DocumentStore::new());
        let jwt = JwtService::new(JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 3600,
        });
        let email = EmailService::new(EmailConfig::default());
        let state = AppState::new(Arc::clone(&store), jwt, email);
        Self {
            router: create_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Registers a user and returns the login response body.
    pub async fn register(&self, email: &str, password: &str) -> Value {
        let response = self
            .post(
                "/api/v1/auth/register",
                None,
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "display_name": "Test User"
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json()
    }

    /// Registers a user and returns an access token.
    pub async fn access_token(&self, email: &str) -> String {
        self.register(email, "password123").await["access_token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}
