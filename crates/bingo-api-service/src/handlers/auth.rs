//! 认证 API 处理器
//!
//! bcrypt 校验是 CPU 密集操作，放到阻塞线程池执行，避免卡住运行时。

use axum::{Json, extract::State};
use bingo_core::LedgerError;
use serde_json::{Value, json};
use tracing::instrument;
use validator::Validate;

use crate::{
    dto::{
        request::{LoginRequest, SignupRequest},
        response::{SafeUser, UserWithCoupons},
    },
    error::{ApiError, Result},
    state::AppState,
};

/// 登录
///
/// POST /api/auth/login
///
/// 成功时返回去除凭据的用户及其全部优惠券。
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;

    let ledger = state.ledger.clone();
    let snapshot = tokio::task::spawn_blocking(move || {
        ledger.login(&payload.email, &payload.password)
    })
    .await
    .map_err(|e| ApiError(LedgerError::Internal(format!("join error: {}", e))))??;

    let user = UserWithCoupons {
        user: SafeUser::from(&snapshot.user),
        coupons: snapshot.coupons,
    };
    Ok(Json(json!({ "success": true, "user": user })))
}

/// 注册
///
/// POST /api/auth/signup
#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<Value>> {
    payload.validate()?;

    let ledger = state.ledger.clone();
    let user = tokio::task::spawn_blocking(move || {
        ledger.signup(&payload.name, &payload.email, &payload.password)
    })
    .await
    .map_err(|e| ApiError(LedgerError::Internal(format!("join error: {}", e))))??;

    let user = UserWithCoupons {
        user: SafeUser::from(&user),
        coupons: vec![],
    };
    Ok(Json(json!({ "success": true, "user": user })))
}
