//! 用户 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
    dto::{
        request::{AddPointsRequest, AdoptStreetRequest},
        response::{SafeUser, UserWithStats},
    },
    error::Result,
    state::AppState,
};

/// 全部用户及其上报计数
///
/// GET /api/users
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Value> {
    let users: Vec<UserWithStats> = state
        .ledger
        .user_summaries()
        .iter()
        .map(|s| UserWithStats::from_summary(s, false))
        .collect();
    Json(json!({ "success": true, "users": users }))
}

/// 认领 / 放弃街道
///
/// PATCH /api/users/{id}/adopt
#[instrument(skip(state, payload))]
pub async fn adopt_street(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AdoptStreetRequest>,
) -> Result<Json<Value>> {
    let user = state.ledger.adopt_street(&id, payload.street)?;
    Ok(Json(json!({ "success": true, "user": SafeUser::from(&user) })))
}

/// 手工加分（引荐、线下清理活动等）
///
/// POST /api/users/{id}/points
#[instrument(skip(state, payload))]
pub async fn add_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddPointsRequest>,
) -> Result<Json<Value>> {
    let reason = payload.reason.as_deref().unwrap_or("Points added");
    let category = payload.category.as_deref().unwrap_or("manual");
    let outcome = state
        .ledger
        .credit_points(&id, payload.points, reason, category)?;

    Ok(Json(json!({
        "success": true,
        "newPoints": outcome.new_points,
        "totalEarned": outcome.total_earned,
        "milestoneUnlocked": outcome.milestone_unlocked
    })))
}
