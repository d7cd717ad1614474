use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::models::{ApiError, Envelope, ErrorBody, ErrorDetails};
use crate::config::Config;
use crate::models::{
    HistoryQuery, LoginData, LoginRequest, PagedResult, RegisterRequest, Supplier, TopupRequest,
    TransactionRecord,
};
use crate::session::Session;

const API_VERSION: &str = "v1";
const SUCCESS_STATUS: &str = "success";
const NETWORK_MESSAGE: &str = "Could not connect to the server. Check your internet connection.";

/// Typed client for the top-up portal REST API
pub struct PortalClient {
    http_client: HttpClient,
    base_url: String,
    session: Arc<Session>,
}

impl PortalClient {
    pub fn new(config: &Config, session: Arc<Session>) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// JSON headers, a per-request id and the bearer token when signed in
    fn create_headers(&self, request_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert("X-Request-Id", value);
        }

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => warn!("Stored token is not a valid header value: {}", e),
            }
        }

        headers
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Envelope<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http_client.get(&url).query(query);
        self.execute(request, "GET", path).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http_client.post(&url).json(body);
        self.execute(request, "POST", path).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!("API request {} {} ({})", method, path, request_id);

        let response = request
            .headers(self.create_headers(&request_id))
            .send()
            .await
            .map_err(|e| {
                warn!("API request {} {} failed: {}", method, path, e);
                network_error(path)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body for {} {}: {}", method, path, e);
            network_error(path)
        })?;
        debug!("API response {} {} -> {} ({})", method, path, status.as_u16(), request_id);

        self.handle_response(method, path, status.as_u16(), &body)
    }

    /// Map a finished response to the decoded envelope.
    ///
    /// A 401 clears the session before the error is returned.
    fn handle_response<T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
    ) -> Result<Envelope<T>, ApiError> {
        if !(200..300).contains(&status) {
            let error = classify_error(status, body, path);
            if error.is_unauthorized() {
                self.session.expire();
            }
            return Err(error);
        }

        let envelope: Envelope<T> = serde_json::from_str(body)
            .map_err(|e| ApiError::Decode(format!("{} {}: {}", method, path, e)))?;
        validate_envelope(envelope)
    }

    /// GET /suppliers
    pub async fn suppliers(&self) -> Result<Vec<Supplier>, ApiError> {
        let envelope = self.get::<Vec<Supplier>>("/suppliers", &[]).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("supplier response has no data".to_string()))
    }

    /// POST /topup
    pub async fn submit_topup(
        &self,
        request: &TopupRequest,
    ) -> Result<Envelope<TransactionRecord>, ApiError> {
        self.post("/topup", request).await
    }

    /// GET /topup/history
    pub async fn history(
        &self,
        query: &HistoryQuery,
    ) -> Result<PagedResult<TransactionRecord>, ApiError> {
        let envelope = self
            .get::<PagedResult<TransactionRecord>>("/topup/history", &query.query_pairs())
            .await?;
        envelope
            .data
            .ok_or_else(|| ApiError::InvalidResponse("history response has no data".to_string()))
    }

    /// POST /auth/login
    pub async fn login(&self, request: &LoginRequest) -> Result<Envelope<LoginData>, ApiError> {
        self.post("/auth/login", request).await
    }

    /// POST /auth/register
    pub async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<Envelope<serde_json::Value>, ApiError> {
        self.post("/auth/register", request).await
    }

    /// GET /health, `true` when the backend answers with a valid envelope
    pub async fn health(&self) -> bool {
        match self.get::<serde_json::Value>("/health", &[]).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

fn validate_envelope<T>(envelope: Envelope<T>) -> Result<Envelope<T>, ApiError> {
    if envelope.status.trim().is_empty() || envelope.message.trim().is_empty() {
        return Err(ApiError::InvalidResponse(
            "response is missing status or message".to_string(),
        ));
    }
    if !envelope.status.trim().eq_ignore_ascii_case(SUCCESS_STATUS) {
        warn!("Backend answered with status {}: {}", envelope.status, envelope.message);
        return Err(ApiError::Rejected {
            status: envelope.status,
            message: envelope.message,
        });
    }
    Ok(envelope)
}

fn network_error(path: &str) -> ApiError {
    ApiError::Network(ErrorDetails {
        error: "Network Error".to_string(),
        message: NETWORK_MESSAGE.to_string(),
        path: path.to_string(),
        timestamp: Utc::now().to_rfc3339(),
        api_version: API_VERSION.to_string(),
        validation_errors: Vec::new(),
    })
}

/// Map a non-success status and its body to an `ApiError`, filling in defaults
/// for anything the backend left out.
pub fn classify_error(status: u16, body: &str, path: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let (default_error, default_message) = match status {
        400 => ("Bad Request", "The request is invalid.".to_string()),
        401 => ("Unauthorized", "Your session has expired. Please sign in again.".to_string()),
        403 => ("Forbidden", "You do not have permission to perform this action.".to_string()),
        404 => ("Not Found", "The requested resource was not found.".to_string()),
        422 => ("Validation Error", "The submitted data is not valid.".to_string()),
        500..=599 => (
            "Internal Server Error",
            "Internal server error. Please try again later.".to_string(),
        ),
        other => ("Unknown Error", format!("Server error ({})", other)),
    };

    // 422 always reports as a validation error, whatever label the body carries.
    let error = if status == 422 {
        default_error.to_string()
    } else {
        parsed.error.unwrap_or_else(|| default_error.to_string())
    };

    let details = ErrorDetails {
        error,
        message: parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default_message),
        path: parsed.path.unwrap_or_else(|| path.to_string()),
        timestamp: parsed.timestamp.unwrap_or_else(|| Utc::now().to_rfc3339()),
        api_version: parsed.api_version.unwrap_or_else(|| API_VERSION.to_string()),
        validation_errors: parsed.validation_errors.unwrap_or_default(),
    };

    match status {
        400 | 422 => ApiError::Validation(details),
        401 => ApiError::Unauthorized(details),
        403 => ApiError::Forbidden(details),
        404 => ApiError::NotFound(details),
        500..=599 => {
            warn!("Server error {} on {}: {}", status, details.path, details.message);
            ApiError::Server(status, details)
        }
        _ => ApiError::UnknownStatus(status, details),
    }
}
