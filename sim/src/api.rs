//! HTTP surface of the server: `POST /fkine` and `GET /robot`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use comau_kinematics::{KinematicChain, KinematicsError, RigidTransform};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Shared, read-only server state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub chain: Arc<KinematicChain>,
}

impl AppState {
    pub fn new(chain: KinematicChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}

/// Joint variables in radians. Missing joints are zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct FkineRequest {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
    pub q5: f64,
    pub q6: f64,
}

impl FkineRequest {
    pub fn angles(&self) -> [f64; 6] {
        [self.q1, self.q2, self.q3, self.q4, self.q5, self.q6]
    }
}

/// Base frame followed by one frame per joint, each a row-major 4x4 matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FkineResponse {
    pub transforms: Vec<[[f64; 4]; 4]>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Engine failure surfaced as `500 {"error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub KinematicsError);

impl From<KinematicsError> for ApiError {
    fn from(err: KinematicsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Forward kinematics failed: {}", self.0);
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub async fn fkine(
    State(state): State<AppState>,
    Json(request): Json<FkineRequest>,
) -> Result<Json<FkineResponse>, ApiError> {
    let frames = state.chain.evaluate(&request.angles())?;
    debug!(angles = ?request.angles(), "fkine");
    Ok(Json(FkineResponse {
        transforms: frames.iter().map(RigidTransform::to_rows).collect(),
    }))
}

/// Joint table, including limits for slider ranges.
pub async fn robot(State(state): State<AppState>) -> Json<KinematicChain> {
    Json(state.chain.as_ref().clone())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/fkine", post(fkine))
        .route("/robot", get(robot))
        .with_state(state)
}
