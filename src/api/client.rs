//! HTTP client for the BC Flow backend
//!
//! Implements every collaborator trait against the `/bc-flow` REST API.
//! Field names are held in camelCase by the wizard and converted to the
//! backend's snake_case on the way out.

use super::error::ApiError;
use super::traits::{DropdownSource, Submitter, TaskStatusSource, Validator};
use super::types::{Credentials, DropdownData, TaskHandle, TaskStatus, ValidationResponse};
use crate::state::{FieldMap, FormSections, SectionName};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::time::Duration;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Path segment in front of every wizard endpoint
const API_PREFIX: &str = "bc-flow";

/// Longest error body kept in an error message, in characters
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the BC Flow REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a new client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let base = Url::parse(&base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Endpoint under the API prefix; each segment is percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .push(API_PREFIX)
            .extend(segments);
        Ok(url)
    }

    fn authorize(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        match credentials.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Decode a JSON body, mapping non-success statuses and bad bodies to errors
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: error_detail(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        url: Url,
        body: &Value,
    ) -> Result<T, ApiError> {
        tracing::debug!("POST {url}");
        let request = Self::authorize(self.http.post(url), credentials).json(body);
        let response = request.send().await?;
        Self::read_json(response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        url: Url,
    ) -> Result<T, ApiError> {
        tracing::debug!("GET {url}");
        let response = Self::authorize(self.http.get(url), credentials)
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl Validator for ApiClient {
    async fn validate_step(
        &self,
        credentials: &Credentials,
        step: u8,
        data: &FieldMap,
    ) -> Result<ValidationResponse, ApiError> {
        let url = self.endpoint(&["validate", &format!("step{step}")])?;
        self.post_json(credentials, url, &section_payload(data))
            .await
    }

    async fn validate_all(
        &self,
        credentials: &Credentials,
        form: &FormSections,
    ) -> Result<ValidationResponse, ApiError> {
        let url = self.endpoint(&["validate", "all"])?;
        self.post_json(credentials, url, &form_payload(form)).await
    }
}

#[async_trait]
impl Submitter for ApiClient {
    async fn submit(
        &self,
        credentials: &Credentials,
        form: &FormSections,
    ) -> Result<TaskHandle, ApiError> {
        let url = self.endpoint(&["submit"])?;
        let handle: TaskHandle = self
            .post_json(credentials, url, &form_payload(form))
            .await?;
        if handle.task_id.trim().is_empty() {
            return Err(ApiError::malformed("submission response has an empty task_id"));
        }
        Ok(handle)
    }
}

#[async_trait]
impl TaskStatusSource for ApiClient {
    async fn get_status(
        &self,
        credentials: &Credentials,
        task_id: &str,
    ) -> Result<TaskStatus, ApiError> {
        let url = self.endpoint(&["task", task_id])?;
        self.get_json(credentials, url).await
    }
}

#[async_trait]
impl DropdownSource for ApiClient {
    async fn dropdown_data(&self, credentials: &Credentials) -> Result<DropdownData, ApiError> {
        let url = self.endpoint(&["dropdown-data"])?;
        self.get_json(credentials, url).await
    }
}

/// Short description of an error body: the JSON `detail` if there is one
fn error_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| match json.get("detail")? {
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        });
    let text = detail.as_deref().unwrap_or(body).trim();
    match text.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Convert a camelCase field name to snake_case
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// JSON body for a single section
pub fn section_payload(data: &FieldMap) -> Value {
    let object: Map<String, Value> = data
        .iter()
        .map(|(name, value)| {
            let value = match SectionName::find_field(name) {
                Some(spec) => spec.wire_value(value),
                None => value.clone(),
            };
            let value = serde_json::to_value(value).unwrap_or(Value::Null);
            (to_snake_case(name), value)
        })
        .collect();
    Value::Object(object)
}

/// JSON body for the whole form
pub fn form_payload(form: &FormSections) -> Value {
    let object: Map<String, Value> = SectionName::ALL
        .into_iter()
        .map(|section| {
            (
                section.wire_key().to_string(),
                section_payload(form.section(section)),
            )
        })
        .collect();
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;
    use axum::{
        extract::{Path, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::{net::TcpListener, sync::Mutex};

    /// What the test server saw for one request
    #[derive(Debug, Clone)]
    struct Captured {
        path: String,
        authorization: Option<String>,
        body: Option<Value>,
    }

    #[derive(Clone, Default)]
    struct ServerState {
        seen: Arc<Mutex<Vec<Captured>>>,
    }

    fn authorization(headers: &HeaderMap) -> Option<String> {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn validate_step(
        State(state): State<ServerState>,
        Path(step): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        state.seen.lock().await.push(Captured {
            path: format!("/validate/{step}"),
            authorization: authorization(&headers),
            body: Some(body),
        });
        Json(json!({
            "is_valid": false,
            "suggestions": ["Consider 10-15%"],
            "warnings": ["Quantity must be greater than 0"]
        }))
    }

    async fn submit(
        State(state): State<ServerState>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        state.seen.lock().await.push(Captured {
            path: "/submit".to_string(),
            authorization: authorization(&headers),
            body: Some(body),
        });
        Json(json!({"task_id": "T1", "status": "processing", "message": "queued"}))
    }

    async fn task(State(state): State<ServerState>, Path(task_id): Path<String>) -> Json<Value> {
        state.seen.lock().await.push(Captured {
            path: format!("/task/{task_id}"),
            authorization: None,
            body: None,
        });
        Json(json!({
            "task_id": task_id,
            "status": "completed",
            "result": "BC form processed successfully",
            "processing_time": 15
        }))
    }

    async fn dropdowns() -> Json<Value> {
        Json(json!({
            "materials": ["Copper Concentrate", "Zinc Concentrate"],
            "delivery_terms": ["FOB", "CIF"],
            "delivery_modes": ["Rail", "Ship"],
            "packaging_options": {"rail": ["Bulk", "Big Bags"], "ship": ["Bulk"]},
            "currencies": ["USD", "EUR"],
            "surveyors": ["Intertek", "SGS"]
        }))
    }

    async fn spawn_server(app: Router) -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }

    async fn spawn_backend() -> (ApiClient, ServerState) {
        let state = ServerState::default();
        let app = Router::new()
            .route("/bc-flow/validate/:step", post(validate_step))
            .route("/bc-flow/submit", post(submit))
            .route("/bc-flow/task/:task_id", get(task))
            .route("/bc-flow/dropdown-data", get(dropdowns))
            .with_state(state.clone());
        let url = spawn_server(app).await;
        let client = ApiClient::new(url, Duration::from_secs(5)).unwrap();
        (client, state)
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("quantityTolerance"), "quantity_tolerance");
        assert_eq!(to_snake_case("tcUsdPerDmt"), "tc_usd_per_dmt");
        assert_eq!(to_snake_case("rcAgUsdPerToz"), "rc_ag_usd_per_toz");
        assert_eq!(to_snake_case("buyer"), "buyer");
    }

    #[test]
    fn test_form_payload_uses_backend_keys() {
        let payload = form_payload(&FormSections::default());
        assert_eq!(payload["deal_basics"]["seller"], json!("Open Mineral"));
        assert_eq!(payload["deal_basics"]["quantity_tolerance"], json!(10.0));
        assert_eq!(payload["commercial_terms"]["transportation_credit"], json!(false));
        assert_eq!(payload["payment_terms"]["cost_sharing_percentage"], json!(50.0));
        assert_eq!(payload["payment_terms"]["currency"], json!("USD"));
    }

    #[test]
    fn test_section_payload_sends_typed_numbers_as_numbers() {
        let mut data = FieldMap::new();
        data.insert("rcAgUsdPerToz".to_string(), FieldValue::from("10.50"));
        data.insert("tcUsdPerDmt".to_string(), FieldValue::from(""));
        data.insert("shipmentPeriod".to_string(), FieldValue::from("2025"));

        assert_eq!(
            section_payload(&data),
            json!({"rc_ag_usd_per_toz": 10.5, "tc_usd_per_dmt": "", "shipment_period": "2025"})
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.endpoint(&["submit"]).unwrap().as_str(),
            "http://localhost:8000/bc-flow/submit"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments_and_keeps_base_path() {
        let client = ApiClient::new("http://host/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint(&["task", "a/b?c#d"]).unwrap().as_str(),
            "http://host/api/bc-flow/task/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let timeout = Duration::from_secs(1);
        let err = ApiClient::new("localhost 8000", timeout).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
        let err = ApiClient::new("mailto:ops@example.com", timeout).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_detail_prefers_json_detail() {
        assert_eq!(
            error_detail(r#"{"detail": "Task not found"}"#),
            "Task not found"
        );
        assert_eq!(
            error_detail(r#"{"detail": [{"msg": "field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
        assert_eq!(error_detail("  upstream down \n"), "upstream down");
    }

    #[test]
    fn test_error_detail_truncates_long_bodies() {
        let page = format!("<html>{}</html>", "é".repeat(500));
        let detail = error_detail(&page);
        assert_eq!(detail.chars().count(), MAX_ERROR_BODY_CHARS + 3);
        assert!(detail.starts_with("<html>é"));
        assert!(detail.ends_with("..."));
    }

    #[tokio::test]
    async fn test_validate_step_posts_snake_case_with_bearer() {
        let (client, state) = spawn_backend().await;
        let mut data = FieldMap::new();
        data.insert("buyer".to_string(), FieldValue::from("Acme"));
        data.insert("quantityTolerance".to_string(), FieldValue::Number(25.0));

        let response = client
            .validate_step(&Credentials::bearer("tok"), 1, &data)
            .await
            .unwrap();

        assert!(!response.is_valid);
        assert_eq!(response.warnings, vec!["Quantity must be greater than 0"]);
        assert_eq!(response.suggestions, vec!["Consider 10-15%"]);

        let seen = state.seen.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path, "/validate/step1");
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok"));
        assert_eq!(
            seen[0].body,
            Some(json!({"buyer": "Acme", "quantity_tolerance": 25.0}))
        );
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization() {
        let (client, state) = spawn_backend().await;
        client
            .validate_all(&Credentials::anonymous(), &FormSections::default())
            .await
            .unwrap();

        let seen = state.seen.lock().await;
        assert_eq!(seen[0].path, "/validate/all");
        assert!(seen[0].authorization.is_none());
        let body = seen[0].body.as_ref().unwrap();
        assert!(body.get("deal_basics").is_some());
        assert!(body.get("commercial_terms").is_some());
        assert!(body.get("payment_terms").is_some());
    }

    #[tokio::test]
    async fn test_submit_returns_task_handle() {
        let (client, state) = spawn_backend().await;
        let handle = client
            .submit(&Credentials::anonymous(), &FormSections::default())
            .await
            .unwrap();
        assert_eq!(handle.task_id, "T1");
        assert_eq!(handle.status.as_deref(), Some("processing"));
        assert_eq!(state.seen.lock().await[0].path, "/submit");
    }

    #[tokio::test]
    async fn test_get_status_and_dropdowns() {
        let (client, _state) = spawn_backend().await;
        let status = client
            .get_status(&Credentials::anonymous(), "abc")
            .await
            .unwrap();
        assert!(status.is_completed());
        assert_eq!(status.task_id.as_deref(), Some("abc"));
        assert_eq!(status.processing_time, Some(15.0));

        let data = client
            .dropdown_data(&Credentials::anonymous())
            .await
            .unwrap();
        assert_eq!(data.currencies, vec!["USD", "EUR"]);
        assert_eq!(
            data.options(crate::state::DropdownList::Packaging, Some("Ship")),
            &["Bulk".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_status_error() {
        let app = Router::new().route(
            "/bc-flow/validate/step4",
            post(|| async { (StatusCode::NOT_FOUND, "{\"detail\":\"Not Found\"}") }),
        );
        let client = ApiClient::new(spawn_server(app).await, Duration::from_secs(5)).unwrap();

        let err = client
            .validate_step(&Credentials::anonymous(), 4, &FieldMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "server returned 404: Not Found");
    }

    #[tokio::test]
    async fn test_bad_gateway_page_is_truncated() {
        let page = format!("<html><body>{}</body></html>", "Bad Gateway ".repeat(100));
        let app = Router::new().route(
            "/bc-flow/dropdown-data",
            get(move || async move { (StatusCode::BAD_GATEWAY, page) }),
        );
        let client = ApiClient::new(spawn_server(app).await, Duration::from_secs(5)).unwrap();

        let err = client
            .dropdown_data(&Credentials::anonymous())
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_task_id_is_sent_as_one_path_segment() {
        let (client, state) = spawn_backend().await;
        let status = client
            .get_status(&Credentials::anonymous(), "a/b?c#d")
            .await
            .unwrap();
        assert_eq!(status.task_id.as_deref(), Some("a/b?c#d"));
        assert_eq!(state.seen.lock().await[0].path, "/task/a/b?c#d");
    }

    #[tokio::test]
    async fn test_malformed_body_is_malformed_error() {
        let app = Router::new().route("/bc-flow/task/:id", get(|| async { "not json" }));
        let client = ApiClient::new(spawn_server(app).await, Duration::from_secs(5)).unwrap();

        let err = client
            .get_status(&Credentials::anonymous(), "T1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_empty_task_id_is_rejected() {
        let app = Router::new().route(
            "/bc-flow/submit",
            post(|| async { Json(json!({"task_id": ""})) }),
        );
        let client = ApiClient::new(spawn_server(app).await, Duration::from_secs(5)).unwrap();

        let err = client
            .submit(&Credentials::anonymous(), &FormSections::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        let err = client
            .dropdown_data(&Credentials::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
