//! API 错误响应
//!
//! 把领域层 LedgerError 映射为 HTTP 状态码与统一错误响应体
//! {success:false, code, message, data:null}。message 面向最终用户，
//! code 是客户端做条件分支用的稳定错误码。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bingo_core::LedgerError;
use serde_json::json;

/// HTTP 层错误，包装领域错误
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub LedgerError);

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            LedgerError::Validation(_)
            | LedgerError::InvalidBrand(_)
            | LedgerError::InvalidAmount(_) => StatusCode::BAD_REQUEST,

            LedgerError::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 兑换门槛与核销校验失败按禁止访问处理
            LedgerError::Unauthorized
            | LedgerError::InvalidCouponHash
            | LedgerError::InsufficientPoints { .. } => StatusCode::FORBIDDEN,

            LedgerError::UserNotFound(_)
            | LedgerError::ReportNotFound(_)
            | LedgerError::CouponNotFound(_)
            | LedgerError::NgoNotFound(_) => StatusCode::NOT_FOUND,

            LedgerError::EmailTaken(_)
            | LedgerError::CouponAlreadyUsed(_)
            | LedgerError::CouponLimitReached { .. }
            | LedgerError::DuplicateVolunteer => StatusCode::CONFLICT,

            LedgerError::Store(_) | LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self.0 {
            LedgerError::Store(e) => {
                tracing::error!(error = %e, "document store failure");
                "Internal server error. Please try again later.".to_string()
            }
            LedgerError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                "Internal server error. Please try again later.".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.0.code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self(LedgerError::Validation(errors.to_string()))
    }
}
