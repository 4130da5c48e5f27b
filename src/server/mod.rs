// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

//! HTTP server.
//!
//! Exposes the authentication surface and the session-gated demo
//! endpoints. Requests are form-encoded, responses are JSON, matching the
//! service this replaces.
//!
//! # Endpoints
//!
//! - `GET /` - Service index
//! - `GET /api/health` - Liveness probe
//! - `GET /api/info` - Name and version
//! - `POST /api/auth/login` - Authenticate, receive a session token
//! - `POST /api/auth/logout` - Revoke a token (idempotent)
//! - `POST /api/auth/check-session` - Validate a token
//! - `POST /api/chat/send` - Canned chat reply (protected)
//! - `POST /api/chat/clear` - Clear chat history (protected)
//! - `POST /api/chat/copy` - Copy reply text (protected)
//! - `POST /api/settings/temperature` - Validate and echo (protected)
//! - `POST /api/settings/topp` - Validate and echo (protected)
//!
//! # Example
//!
//! ```no_run
//! use echogate::server::Server;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let server = Server::from_env();
//! server.start().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Form, State},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::timeout::TimeoutLayer;

use crate::auth::{AuthService, SessionGuard};
use crate::chat;
use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::errors::{ApiError, ApiResult};
use crate::settings;

// Maximum request body size; every request here is a small form post
const MAX_BODY_SIZE: usize = 64 * 1024;
// Per-request timeout, generous for purely in-memory handlers
const REQUEST_TIMEOUT_SECS: u64 = 30;
// How often the background sweep reclaims expired sessions
const SWEEP_INTERVAL_SECS: u64 = 300;

/// Server state shared across handlers.
pub struct AppState {
    /// Authentication service owning the session store.
    pub auth: Arc<AuthService>,
    /// The authorization checkpoint for protected endpoints.
    pub guard: SessionGuard,
    /// Time source, shared with the auth service.
    pub clock: Arc<dyn Clock>,
}

/// Server configuration and entry point.
pub struct Server {
    config: ServiceConfig,
}

impl Default for Server {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

impl Server {
    /// Create a server from an explicit configuration.
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    /// Create a server from `ECHOGATE_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(ServiceConfig::from_env())
    }

    /// Override the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Override the bind address.
    /// Use "0.0.0.0" to allow network access, "127.0.0.1" (default) for
    /// localhost only.
    pub fn with_bind_address(mut self, addr: impl Into<String>) -> Self {
        self.config.bind_address = addr.into();
        self
    }

    /// Build the router with all routes, backed by a fresh session store.
    pub fn build_router(&self) -> Router {
        self.build_router_with_clock(Arc::new(SystemClock))
    }

    /// Build the router against an injected clock (tests drive time
    /// through this).
    pub fn build_router_with_clock(&self, clock: Arc<dyn Clock>) -> Router {
        Self::routes(self.app_state(clock))
    }

    fn app_state(&self, clock: Arc<dyn Clock>) -> Arc<AppState> {
        let auth = Arc::new(AuthService::new(&self.config, clock.clone()));
        Arc::new(AppState {
            guard: SessionGuard::new(auth.clone()),
            auth,
            clock,
        })
    }

    fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/api/health", get(health_handler))
            .route("/api/info", get(info_handler))
            .route("/api/auth/login", post(login_handler))
            .route("/api/auth/logout", post(logout_handler))
            .route("/api/auth/check-session", post(check_session_handler))
            .route("/api/chat/send", post(chat_send_handler))
            .route("/api/chat/clear", post(chat_clear_handler))
            .route("/api/chat/copy", post(chat_copy_handler))
            .route("/api/settings/temperature", post(set_temperature_handler))
            .route("/api/settings/topp", post(set_top_p_handler))
            .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
            .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .with_state(state)
    }

    /// Start the server with graceful shutdown.
    pub async fn start(&self) -> Result<()> {
        let state = self.app_state(Arc::new(SystemClock));
        let router = Self::routes(state.clone());

        let addr = format!("{}:{}", self.config.bind_address, self.config.port);
        tracing::info!("Starting server on {}", addr);

        if self.config.bind_address == "0.0.0.0" {
            tracing::warn!(
                "Server is binding to 0.0.0.0 which exposes the API to the network. \
                Use 127.0.0.1 (default) for local-only access."
            );
        }

        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                anyhow::anyhow!(
                    "Port {} is already in use. \
                    This usually means another echogate instance is running. \
                    Try stopping it or pass a different port with: echogate --port <PORT>",
                    self.config.port
                )
            } else {
                anyhow::anyhow!("Failed to bind to {}: {}", addr, e)
            }
        })?;

        // Periodic sweep: memory hygiene only, validation never depends on it
        let sweeper = tokio::spawn({
            let state = state.clone();
            async move {
                let mut interval =
                    tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
                interval.tick().await; // first tick fires immediately; skip it
                loop {
                    interval.tick().await;
                    state.auth.store().sweep_expired(state.clock.now());
                }
            }
        });

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweeper.abort();
        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the configured port.
    pub fn port(&self) -> u16 {
        self.config.port
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    login: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct TokenForm {
    session_token: String,
}

#[derive(Deserialize)]
struct ChatSendForm {
    message: String,
    session_token: String,
}

#[derive(Deserialize)]
struct ChatCopyForm {
    #[allow(dead_code)]
    text: String,
    session_token: String,
}

#[derive(Deserialize)]
struct SettingForm {
    value: i64,
    session_token: String,
}

/// Successful login response.
#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    #[serde(rename = "redirectUrl")]
    redirect_url: String,
    #[serde(rename = "sessionToken")]
    session_token: String,
}

/// Logout response; returned for known and unknown tokens alike.
#[derive(Serialize)]
struct LogoutResponse {
    message: &'static str,
}

/// Session check response.
#[derive(Serialize)]
struct SessionCheckResponse {
    valid: bool,
    user_login: String,
    expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct ChatResponse {
    answer: String,
}

#[derive(Serialize)]
struct ChatActionResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct SettingResponse {
    value: i64,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct InfoResponse {
    name: &'static str,
    version: &'static str,
}

/// Root index: a map of everything the service offers.
#[derive(Serialize)]
struct ServiceIndex {
    message: &'static str,
    version: &'static str,
    endpoints: EndpointIndex,
}

#[derive(Serialize)]
struct EndpointIndex {
    login: &'static str,
    logout: &'static str,
    check_session: &'static str,
    chat_send: &'static str,
    settings_temperature: &'static str,
    settings_top_p: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Service index handler.
async fn root_handler() -> Json<ServiceIndex> {
    Json(ServiceIndex {
        message: "Service API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: EndpointIndex {
            login: "/api/auth/login",
            logout: "/api/auth/logout",
            check_session: "/api/auth/check-session",
            chat_send: "/api/chat/send",
            settings_temperature: "/api/settings/temperature",
            settings_top_p: "/api/settings/topp",
        },
    })
}

/// Liveness probe. The service has no external dependencies, so alive
/// means ok.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn info_handler() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "echogate",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Login handler: credential check, then session issuance.
async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<LoginResponse>> {
    if form.login.is_empty() || form.password.is_empty() {
        return Err(ApiError::validation(
            "credentials",
            "login and password are required",
        ));
    }

    let issued = state.auth.login(&form.login, &form.password)?;

    Ok(Json(LoginResponse {
        message: "Authentication successful",
        redirect_url: issued.redirect_url,
        session_token: issued.token,
    }))
}

/// Logout handler. Always 200: revoking an absent token is not an error,
/// and the response never reveals whether the token ever existed.
async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> Json<LogoutResponse> {
    state.auth.logout(&form.session_token);
    Json(LogoutResponse {
        message: "Logged out",
    })
}

/// Session check handler.
async fn check_session_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> ApiResult<Json<SessionCheckResponse>> {
    let info = state.guard.check(&form.session_token)?;

    Ok(Json(SessionCheckResponse {
        valid: true,
        user_login: info.user_login,
        expires_at: info.expires_at,
    }))
}

/// Chat handler: guard first, canned reply second.
async fn chat_send_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ChatSendForm>,
) -> ApiResult<Json<ChatResponse>> {
    state.guard.check(&form.session_token)?;

    let answer = chat::reply(&form.message, state.clock.now())?;
    Ok(Json(ChatResponse { answer }))
}

/// Chat clear handler. There is no per-session history to drop; the
/// endpoint exists for surface compatibility and still requires a valid
/// session.
async fn chat_clear_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> ApiResult<Json<ChatActionResponse>> {
    state.guard.check(&form.session_token)?;
    Ok(Json(ChatActionResponse {
        message: "Chat cleared",
    }))
}

/// Chat copy handler. Acknowledges the copy; the text itself is not
/// retained.
async fn chat_copy_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ChatCopyForm>,
) -> ApiResult<Json<ChatActionResponse>> {
    state.guard.check(&form.session_token)?;
    Ok(Json(ChatActionResponse {
        message: "Text copied",
    }))
}

/// Temperature handler: guard, validate 0..=200, echo.
async fn set_temperature_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingForm>,
) -> ApiResult<Json<SettingResponse>> {
    state.guard.check(&form.session_token)?;

    let value = settings::validate_temperature(form.value)?;
    Ok(Json(SettingResponse { value }))
}

/// Top-p handler: guard, validate 0..=100, echo.
async fn set_top_p_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SettingForm>,
) -> ApiResult<Json<SettingResponse>> {
    state.guard.check(&form.session_token)?;

    let value = settings::validate_top_p(form.value)?;
    Ok(Json(SettingResponse { value }))
}

// =============================================================================
// Utilities
// =============================================================================

/// Graceful shutdown signal handler.
///
/// Waits for SIGINT/SIGTERM (Ctrl+C only on non-Unix platforms), then
/// lets the server drain in-flight requests.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt())
            .expect("failed to install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
            }
            _ = sigint.recv() => {
                tracing::info!("Received SIGINT, shutting down gracefully");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down gracefully");
    }
}
