//! HTTP endpoint handlers.
//!
//! `/webhook` and `/send` go through the [`BotService`] when one was built at
//! startup and report `Server not initialized` otherwise. `/` and `/health`
//! only describe the process and always answer.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::line::SIGNATURE_HEADER;
use crate::relay::SendRequest;
use crate::service::BotService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    bot: Option<Arc<BotService>>,
}

impl AppState {
    pub fn new(bot: Option<BotService>) -> Self {
        Self {
            bot: bot.map(Arc::new),
        }
    }

    /// State with no bot service: webhook and send are disabled.
    pub fn uninitialized() -> Self {
        Self { bot: None }
    }

    pub fn is_ready(&self) -> bool {
        self.bot.is_some()
    }

    fn ready_bot(&self) -> Result<&BotService, AppError> {
        self.bot.as_deref().ok_or_else(|| {
            warn!("request_while_uninitialized");
            AppError::Uninitialized
        })
    }
}

// =============================================================================
// CORS
// =============================================================================

/// Adds CORS headers to every response and answers `OPTIONS` directly.
pub async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    response
}

// =============================================================================
// Info & Health
// =============================================================================

#[derive(Serialize)]
pub struct ServiceInfo {
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: &'static str,
}

/// Service descriptor.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        status: "LINE Trip List Webhook Server",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: "/health, /webhook, /send",
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Unix seconds, as a string
    pub timestamp: String,
}

/// Liveness check. Does not depend on credentials.
pub async fn health() -> Json<HealthResponse> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    Json(HealthResponse {
        status: "ok",
        service: "LINE Trip List Webhook",
        timestamp: now.to_string(),
    })
}

// =============================================================================
// LINE Webhook
// =============================================================================

/// LINE webhook endpoint.
///
/// Acks with an empty 200 once the signature checks out and the body parses,
/// whatever happens to the forwarded messages afterwards. Any verb is
/// accepted; without a valid signature the request is rejected with 400.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<StatusCode, AppError> {
    let bot = state.ready_bot()?;

    let body = body.map_err(|e| {
        error!(error = %e, "webhook_body_read_failed");
        AppError::Internal
    })?;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "webhook_received"
    );

    bot.handle_webhook(&body, signature)?;

    Ok(StatusCode::OK)
}

// =============================================================================
// Push
// =============================================================================

#[derive(Serialize)]
pub struct SendResponse {
    pub status: &'static str,
}

/// Push a text message to a group.
///
/// Body: `{"group_id": "...", "message": "..."}`. Not idempotent. The
/// initialization check comes before the method check.
pub async fn send(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SendResponse>, AppError> {
    let bot = state.ready_bot()?;

    if method != Method::POST {
        warn!(method = %method, "send_method_not_allowed");
        return Err(AppError::MethodNotAllowed);
    }

    let body = body.map_err(|e| {
        error!(error = %e, "send_body_read_failed");
        AppError::Internal
    })?;

    let req: SendRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "send_body_invalid");
        AppError::Validation("Invalid JSON body")
    })?;

    bot.send(&req).await?;

    Ok(Json(SendResponse { status: "success" }))
}

// =============================================================================
// Fallback
// =============================================================================

pub async fn not_found() -> AppError {
    AppError::NotFound
}
