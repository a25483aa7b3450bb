//! 奖励 API 处理器：状态查询、兑换、核销、积分流水

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::{
        request::{RedeemRequest, UseCouponRequest},
        response::DiscountRange,
    },
    error::Result,
    state::AppState,
};

/// 用户奖励状态
///
/// GET /api/rewards/{userId}
///
/// discount_range 仅在用户达到 Silver 及以上时出现，未达标为 null。
#[instrument(skip(state))]
pub async fn reward_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let status = state.ledger.reward_status(&user_id)?;

    let discount_range = status.discount_range.map(|(min, max)| DiscountRange {
        min,
        max,
        tier: status.tier,
        milestone: status.tier.milestone_value().unwrap_or_default(),
    });
    let active_coupon = status.active_coupons.first().cloned();

    Ok(Json(json!({
        "success": true,
        "points": status.points,
        "total_earned": status.total_earned,
        "milestone_status": status.milestone_status,
        "next_milestone": status.next_milestone,
        "tier": status.tier,
        "discount_range": discount_range,
        "active_coupon": active_coupon,
        "active_coupons": status.active_coupons,
        "all_coupons": status.all_coupons
    })))
}

/// 兑换优惠券
///
/// POST /api/rewards/redeem
#[instrument(skip(state, payload))]
pub async fn redeem_coupon(
    State(state): State<AppState>,
    Json(payload): Json<RedeemRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;
    let outcome = state.ledger.redeem_coupon(&payload.user_id, &payload.brand)?;
    Ok(Json(json!({
        "success": true,
        "coupon": outcome.coupon,
        "remainingPoints": outcome.remaining_points
    })))
}

/// 核销优惠券
///
/// PATCH /api/rewards/coupon/{id}/use
#[instrument(skip(state, payload))]
pub async fn use_coupon(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UseCouponRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;
    state
        .ledger
        .mark_coupon_used(&id, &payload.user_id, &payload.hash)?;
    Ok(Json(json!({
        "success": true,
        "message": "Coupon used successfully"
    })))
}

/// 积分流水，按时间倒序
///
/// GET /api/points-history/{userId}
#[instrument(skip(state))]
pub async fn points_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    let history = state.ledger.points_history(&user_id);
    Json(json!({ "success": true, "history": history }))
}
