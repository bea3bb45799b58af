use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use course_search_core::registry::IndexRegistry;
use course_search_core::retrieval::RetrievalService;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::adapters::{BypassIdentityAdapter, GatewayIdentityAdapter, InMemoryProfileAdapter};
use crate::config::Config;
use crate::web::{app_router, AppState, RequestMetrics};

pub(super) const TEACHER: (&str, &str) = ("teacher-1", "teacher");

pub(super) struct TestHarness {
    pub(super) state: Arc<AppState>,
    pub(super) router: Router,
}

impl TestHarness {
    pub(super) fn setup() -> Self {
        Self::with_config(Config::default())
    }

    pub(super) fn bypass() -> Self {
        Self::with_config(Config {
            auth_bypass: true,
            ..Config::default()
        })
    }

    pub(super) fn with_config(config: Config) -> Self {
        let identity: Arc<dyn course_search_core::ports::IdentityProvider> = if config.auth_bypass
        {
            Arc::new(BypassIdentityAdapter::new())
        } else {
            Arc::new(GatewayIdentityAdapter)
        };
        let state = Arc::new(AppState {
            config: Arc::new(config),
            retrieval: Arc::new(RetrievalService::new(IndexRegistry::new())),
            identity,
            profiles: Arc::new(InMemoryProfileAdapter::new()),
            metrics: Arc::new(RequestMetrics::default()),
        });
        let router = app_router(state.clone());
        Self { state, router }
    }

    /// Sends a request as `caller` (uid, role); `None` sends no identity headers.
    pub(super) async fn send(
        &self,
        method: &str,
        path: &str,
        caller: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> Response {
        let body = body.map(|value| serde_json::to_vec(&value).expect("json request body"));
        self.send_bytes(method, path, caller, body).await
    }

    /// Like [`TestHarness::send`], but posts `body` verbatim as JSON, valid or not.
    pub(super) async fn send_raw(
        &self,
        method: &str,
        path: &str,
        caller: Option<(&str, &str)>,
        body: &str,
    ) -> Response {
        self.send_bytes(method, path, caller, Some(body.as_bytes().to_vec()))
            .await
    }

    async fn send_bytes(
        &self,
        method: &str,
        path: &str,
        caller: Option<(&str, &str)>,
        body: Option<Vec<u8>>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((uid, role)) = caller {
            builder = builder.header("x-user-id", uid).header("x-user-role", role);
        }
        let body = match body {
            Some(bytes) => {
                builder = builder.header("content-type", "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };
        self.router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response")
    }

    /// Seeds `documents` into `course_id` as a teacher and returns the stored ids.
    pub(super) async fn seed(&self, course_id: &str, documents: Value) -> Vec<String> {
        let response = self
            .send(
                "POST",
                &format!("/v1/courses/{course_id}/documents:batchCreate"),
                Some(TEACHER),
                Some(json!({ "documents": documents })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = decode_json(response).await;
        body["documents"]
            .as_array()
            .expect("documents array")
            .iter()
            .map(|doc| doc["id"].as_str().expect("id").to_string())
            .collect()
    }

    /// Stores an enrollment for `uid` through the profile endpoint.
    pub(super) async fn enroll(&self, uid: &str, courses: &[&str]) {
        let response = self
            .send(
                "POST",
                "/v1/users/me",
                Some((uid, "student")),
                Some(json!({ "courses": courses })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

pub(super) async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body bytes");
    serde_json::from_slice(&bytes).expect("decode json")
}

pub(super) fn result_ids(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|hit| hit["id"].as_str().expect("id").to_string())
        .collect()
}
