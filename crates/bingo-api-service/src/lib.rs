//! BIN-GO REST API 服务
//!
//! 面向市民客户端与管理后台的 HTTP 接口层，业务规则全部在
//! bingo-core 的 RewardLedger 中实现。

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use state::AppState;

/// 组装完整的应用路由（不含 CORS，CORS 由入口按环境配置）
pub fn app(state: AppState) -> Router {
    let api = routes::api_routes().route("/health", get(api_health));
    Router::new()
        .nest("/api", api)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 存活探针：服务进程正常即返回 ok
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "bingo-api-service"
    }))
}

/// 健康信息：附带文档路径与服务端时间
async fn api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "db": state.ledger.store().path().display().to_string(),
        "ts": Utc::now()
    }))
}
