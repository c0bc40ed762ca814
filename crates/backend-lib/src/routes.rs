// ============================
// promptdesk-backend-lib/src/routes.rs
// ============================
//! HTTP router and request handlers.
//!
//! This is the only layer that turns [`AppError`] values into status codes
//! and response bodies; the auth and inference cores never see HTTP.
use std::sync::Arc;

use axum::{
    extract::{Extension, Query, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use zeroize::Zeroize;

use crate::error::AppError;
use crate::llm::DEFAULT_MAX_TOKENS;
use crate::messages::{
    HealthResponse, LoginRequest, LoginResponse, LogoutParams, LogoutResponse, ModelSwitchRequest,
    ModelSwitchResponse, ModelsResponse, QueryRequest, QueryResponse, SessionsResponse, UserInfo,
};
use crate::metrics as keys;
use crate::middleware::{bearer_token, require_session, AuthedUser};
use crate::AppState;

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/query", post(query))
        .route("/switch-model", post(switch_model))
        .route("/me", get(me))
        .route("/sessions", get(sessions))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/models", get(models))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        // The browser frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "PromptDesk API is running",
        "status": "active",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        current_model: state.llm.current_model(),
    })
}

async fn models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.llm.available_models(),
        current: state.llm.current_model(),
    })
}

/// `POST /login`: 200 with a token on success, 401 with a generic message
/// otherwise. The response never says whether the username or the password
/// was wrong.
async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client = client_addr(&headers);
    if !state.login_limiter.check(&client) {
        return Err(AppError::AuthRateLimited);
    }

    let LoginRequest {
        username,
        mut password,
    } = payload;
    let outcome = state.auth.login(&username, &password).await;
    password.zeroize();

    match outcome {
        Ok(token) => {
            state.login_limiter.record_success(&client);
            Ok((
                StatusCode::OK,
                Json(LoginResponse {
                    success: true,
                    token: Some(token),
                    message: "Login successful".to_string(),
                    username: Some(username),
                }),
            ))
        },
        Err(AppError::InvalidCredentials) => {
            state.login_limiter.record_failure(&client);
            Ok((
                StatusCode::UNAUTHORIZED,
                Json(LoginResponse {
                    success: false,
                    token: None,
                    message: "Invalid username or password".to_string(),
                    username: None,
                }),
            ))
        },
        Err(other) => Err(other),
    }
}

/// `POST /logout?token=...`: always 200; `success` reports whether a
/// session was actually removed.
async fn logout(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogoutParams>,
) -> Json<LogoutResponse> {
    let removed = state.auth.logout(&params.token).await;
    let message = if removed {
        "Logged out"
    } else {
        "No active session for that token"
    };

    Json(LogoutResponse {
        success: removed,
        message: message.to_string(),
    })
}

async fn query(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthedUser>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let max_tokens = payload.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    let (response, model) = state.llm.generate(&payload.prompt, max_tokens).await?;

    counter!(keys::QUERY_HANDLED).increment(1);
    debug!(user = %user.0, model = %model, "query_handled");

    Ok(Json(QueryResponse { response, model }))
}

async fn switch_model(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ModelSwitchRequest>,
) -> Result<Json<ModelSwitchResponse>, AppError> {
    let message = state.llm.switch_model(&payload.model_name)?;

    Ok(Json(ModelSwitchResponse {
        message,
        current_model: state.llm.current_model(),
    }))
}

/// Session details for the calling token.
async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserInfo>, AppError> {
    let token = bearer_token(&headers)?;
    state
        .auth
        .session_info(token)
        .await
        .map(Json)
        .ok_or(AppError::Unauthenticated)
}

/// Administrative introspection: live-session count plus a token-free list.
async fn sessions(State(state): State<Arc<AppState>>) -> Json<SessionsResponse> {
    Json(SessionsResponse {
        active: state.auth.session_count().await,
        sessions: state.auth.list_sessions().await,
    })
}

/// Best-effort client address for login throttling; the reverse proxy sets
/// `x-real-ip`.
fn client_addr(headers: &HeaderMap) -> String {
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
