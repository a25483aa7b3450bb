//! NGO API 处理器：列表、志愿者报名、沙箱捐赠与个人历史

use axum::{
    Json,
    extract::{Path, Query, State},
};
use bingo_core::{DonationRequest, VolunteerApplication};
use serde_json::{Value, json};
use tracing::instrument;

use crate::{
    dto::{
        request::{DonateRequest, MyNgosQuery, VolunteerRequest},
        response::{JoinedNgo, NgoWithStats, ReceiptBody},
    },
    error::Result,
    state::AppState,
};

/// 全部 NGO 及推导统计
///
/// GET /api/ngos
#[instrument(skip(state))]
pub async fn list_ngos(State(state): State<AppState>) -> Json<Value> {
    let ngos: Vec<NgoWithStats> = state
        .ledger
        .list_ngos()
        .into_iter()
        .map(NgoWithStats::from)
        .collect();
    Json(json!({ "success": true, "ngos": ngos }))
}

/// 单个 NGO
///
/// GET /api/ngos/{id}
#[instrument(skip(state))]
pub async fn get_ngo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let ngo = NgoWithStats::from(state.ledger.get_ngo(&id)?);
    Ok(Json(json!({ "success": true, "ngo": ngo })))
}

/// 用户已加入的 NGO
///
/// GET /api/my-ngos?userId={id}
#[instrument(skip(state))]
pub async fn my_ngos(
    State(state): State<AppState>,
    Query(query): Query<MyNgosQuery>,
) -> Json<Value> {
    let ngos: Vec<JoinedNgo> = state
        .ledger
        .my_ngos(&query.user_id)
        .into_iter()
        .map(|(ngo, joined_at)| JoinedNgo { ngo, joined_at })
        .collect();
    Json(json!({ "success": true, "ngos": ngos }))
}

/// 以志愿者身份加入 NGO
///
/// POST /api/ngos/{id}/volunteer
#[instrument(skip(state, payload))]
pub async fn join_volunteer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<VolunteerRequest>,
) -> Result<Json<Value>> {
    let outcome = state.ledger.join_volunteer(
        &id,
        VolunteerApplication {
            user_id: payload.user_id,
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            city: payload.city,
            skills: payload.skills,
            availability: payload.availability,
        },
    )?;

    let message = format!(
        "Welcome! You have joined {} as a volunteer.",
        outcome.volunteer.ngo_name
    );
    Ok(Json(json!({
        "success": true,
        "volunteer": outcome.volunteer,
        "message": message,
        "newPoints": outcome.new_points,
        "milestoneUnlocked": outcome.milestone_unlocked
    })))
}

/// 沙箱捐赠
///
/// POST /api/ngos/{id}/donate
#[instrument(skip(state, payload))]
pub async fn donate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DonateRequest>,
) -> Result<Json<Value>> {
    let outcome = state.ledger.donate(
        &id,
        DonationRequest {
            user_id: payload.user_id,
            amount: payload.amount,
            payment_method: payload.payment_method,
            donor_name: payload.donor_name,
            donor_email: payload.donor_email,
        },
    )?;

    let receipt = ReceiptBody {
        receipt_no: outcome.receipt.receipt_no,
        txn_id: outcome.receipt.txn_id,
        amount: outcome.receipt.amount,
        ngo_name: outcome.receipt.ngo_name,
        date: outcome.receipt.date,
    };
    Ok(Json(json!({
        "success": true,
        "donation": outcome.donation,
        "receipt": receipt,
        "impactMessage": outcome.impact_message,
        "pointsEarned": outcome.points_earned,
        "milestoneUnlocked": outcome.milestone_unlocked
    })))
}

/// 用户捐赠历史
///
/// GET /api/donations/{userId}
#[instrument(skip(state))]
pub async fn donation_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    let donations = state.ledger.donations_for(&user_id);
    Json(json!({ "success": true, "donations": donations }))
}

/// 用户志愿者报名历史
///
/// GET /api/volunteers/{userId}
#[instrument(skip(state))]
pub async fn volunteer_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Value> {
    let volunteers = state.ledger.volunteer_entries_for(&user_id);
    Json(json!({ "success": true, "volunteers": volunteers }))
}
