use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use pathwise_core::video::{BatchVerification, VideoLookup};
use pathwise_core::{LearningPlan, PlanRequest, PlanService, PlanServiceError, SkillLevel};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

const MISSING_FIELDS: &str = "Missing required fields";
const GEMINI_NOT_CONFIGURED: &str = "Gemini API key not configured";
const YOUTUBE_NOT_CONFIGURED: &str = "YouTube API key not configured";
const GENERATION_FAILED: &str = "Failed to generate learning plan";

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

/// Shared handler state. A `None` service answers its routes with a
/// "not configured" error instead of preventing startup.
#[derive(Clone, Default)]
pub struct AppState {
    pub plans: Option<Arc<PlanService>>,
    pub videos: Option<Arc<VideoLookup>>,
}

/// `POST /api/plan` body. Every field is optional here so that absent and
/// empty values get the same 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanBody {
    topic: Option<String>,
    time_to_invest: Option<u32>,
    skill_level: Option<String>,
}

impl PlanBody {
    fn into_request(self) -> Result<PlanRequest, AppError> {
        let (Some(topic), Some(hours), Some(level)) =
            (self.topic, self.time_to_invest, self.skill_level)
        else {
            return Err(AppError::bad_request(MISSING_FIELDS));
        };
        if topic.trim().is_empty() || hours == 0 || level.trim().is_empty() {
            return Err(AppError::bad_request(MISSING_FIELDS));
        }
        let level: SkillLevel = level
            .parse()
            .map_err(|_| AppError::bad_request(format!("Invalid skill level: {level}")))?;
        Ok(PlanRequest::new(topic, hours, level))
    }
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    videos: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/plan", post(create_plan))
        .route("/api/videos/verify", post(verify_videos))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    if state.plans.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; /api/plan will return 500");
    }
    if state.videos.is_none() {
        tracing::warn!("YOUTUBE_API_KEY not set; plans will have no videos and /api/videos/verify will return 500");
    }

    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("pathwise serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("pathwise serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_plan(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LearningPlan>, AppError> {
    let body: PlanBody =
        serde_json::from_slice(&body).map_err(|_| AppError::bad_request(MISSING_FIELDS))?;
    let request = body.into_request()?;

    let Some(service) = &state.plans else {
        return Err(AppError::internal(GEMINI_NOT_CONFIGURED));
    };

    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        topic = %request.topic,
        hours = request.time_to_invest,
        level = %request.skill_level,
        "plan requested"
    );

    match service.create_plan(request).await {
        Ok(plan) => Ok(Json(plan)),
        Err(PlanServiceError::InvalidInput(err)) => {
            tracing::debug!(%request_id, error = %err, "plan request rejected");
            Err(AppError::bad_request(MISSING_FIELDS))
        }
        Err(err) => {
            tracing::error!(%request_id, error = %err, "POST /api/plan failed");
            Err(AppError::internal(GENERATION_FAILED))
        }
    }
}

async fn verify_videos(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<BatchVerification>>, AppError> {
    let references = serde_json::from_slice::<VerifyBody>(&body)
        .ok()
        .and_then(|b| b.videos)
        .ok_or_else(|| AppError::bad_request("Missing videos list"))?;

    let Some(lookup) = &state.videos else {
        return Err(AppError::internal(YOUTUBE_NOT_CONFIGURED));
    };

    Ok(Json(lookup.verify_batch(&references).await))
}
