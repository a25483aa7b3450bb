//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{handlers, state::AppState};

/// /api 下的全部业务路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // 认证
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/signup", post(handlers::auth::signup))
        // 上报
        .route("/reports", get(handlers::reports::list_reports))
        .route("/reports", post(handlers::reports::create_report))
        .route(
            "/reports/{id}/status",
            patch(handlers::reports::update_report_status),
        )
        // 用户
        .route("/users", get(handlers::users::list_users))
        .route("/users/{id}/adopt", patch(handlers::users::adopt_street))
        .route("/users/{id}/points", post(handlers::users::add_points))
        // 奖励
        .route("/rewards/{user_id}", get(handlers::rewards::reward_status))
        .route("/rewards/redeem", post(handlers::rewards::redeem_coupon))
        .route(
            "/rewards/coupon/{id}/use",
            patch(handlers::rewards::use_coupon),
        )
        .route(
            "/points-history/{user_id}",
            get(handlers::rewards::points_history),
        )
        // 管理端
        .route("/admin/coupons", get(handlers::admin::coupon_overview))
        .route("/admin/leaderboard", get(handlers::admin::leaderboard))
        // NGO
        .route("/ngos", get(handlers::ngos::list_ngos))
        .route("/ngos/{id}", get(handlers::ngos::get_ngo))
        .route("/my-ngos", get(handlers::ngos::my_ngos))
        .route("/ngos/{id}/volunteer", post(handlers::ngos::join_volunteer))
        .route("/ngos/{id}/donate", post(handlers::ngos::donate))
        .route(
            "/donations/{user_id}",
            get(handlers::ngos::donation_history),
        )
        .route(
            "/volunteers/{user_id}",
            get(handlers::ngos::volunteer_history),
        )
}
