//! 管理端 API 处理器：优惠券分析与排行榜

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{dto::response::UserWithStats, state::AppState};

/// 优惠券总览
///
/// GET /api/admin/coupons
#[instrument(skip(state))]
pub async fn coupon_overview(State(state): State<AppState>) -> Json<Value> {
    let overview = state.ledger.coupon_overview();
    Json(json!({
        "success": true,
        "coupons": overview.coupons,
        "stats": {
            "total": overview.stats.total,
            "used": overview.stats.used,
            "active": overview.stats.active,
            "expired": overview.stats.expired,
            "totalDiscount": overview.stats.total_discount,
            "avgDiscount": overview.stats.avg_discount
        }
    }))
}

/// 排行榜：累计获得积分前 20 名
///
/// GET /api/admin/leaderboard
#[instrument(skip(state))]
pub async fn leaderboard(State(state): State<AppState>) -> Json<Value> {
    let leaderboard: Vec<UserWithStats> = state
        .ledger
        .leaderboard()
        .iter()
        .map(|s| UserWithStats::from_summary(s, true))
        .collect();
    Json(json!({ "success": true, "leaderboard": leaderboard }))
}
