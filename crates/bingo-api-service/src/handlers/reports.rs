//! 上报 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use bingo_core::NewReport;
use serde_json::{Value, json};
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::request::{CreateReportRequest, UpdateReportStatusRequest},
    error::Result,
    state::AppState,
};

/// 全部上报，按时间倒序
///
/// GET /api/reports
#[instrument(skip(state))]
pub async fn list_reports(State(state): State<AppState>) -> Json<Value> {
    let reports = state.ledger.list_reports();
    Json(json!({ "success": true, "reports": reports }))
}

/// 提交新上报
///
/// POST /api/reports
///
/// 奖励即时入账，响应附带新余额与本次跨越的里程碑。
#[instrument(skip(state, payload))]
pub async fn create_report(
    State(state): State<AppState>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;

    let outcome = state.ledger.submit_report(NewReport {
        user_id: payload.user_id,
        area: payload.area,
        waste_type: payload.waste_type,
        description: payload.description,
        lat: payload.lat,
        lng: payload.lng,
        image_url: payload.image_url,
    })?;

    Ok(Json(json!({
        "success": true,
        "report": outcome.report,
        "newPoints": outcome.new_points,
        "milestoneUnlocked": outcome.milestone_unlocked
    })))
}

/// 更新上报状态
///
/// PATCH /api/reports/{id}/status
#[instrument(skip(state, payload))]
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReportStatusRequest>,
) -> Result<Json<Value>> {
    let (report, milestone) = state.ledger.update_report_status(&id, payload.status)?;
    Ok(Json(json!({
        "success": true,
        "report": report,
        "milestoneUnlocked": milestone
    })))
}
