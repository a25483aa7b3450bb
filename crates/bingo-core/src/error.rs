//! 领域错误类型
//!
//! 错误消息直接作为 API 响应的 message 字段面向最终用户，保持可读英文；
//! code() 返回稳定的机器可读错误码，是 API 契约的一部分。

use bingo_shared::store::StoreError;
use thiserror::Error;

/// 奖励账本及周边操作的错误类型
#[derive(Debug, Error)]
pub enum LedgerError {
    // 参数校验
    #[error("{0}")]
    Validation(String),

    #[error("Invalid brand selected")]
    InvalidBrand(String),

    #[error("Invalid points amount")]
    InvalidAmount(i64),

    // 资源不存在
    #[error("User not found")]
    UserNotFound(String),

    #[error("Report not found")]
    ReportNotFound(String),

    #[error("Coupon not found")]
    CouponNotFound(String),

    #[error("NGO not found")]
    NgoNotFound(String),

    // 账户
    #[error("Email already registered")]
    EmailTaken(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    // 优惠券核销：检查顺序固定为 存在 → 归属 → 已用 → 哈希，
    // 未授权调用方不能通过失败类型探测优惠券状态
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Coupon already used")]
    CouponAlreadyUsed(String),

    #[error("Invalid coupon hash")]
    InvalidCouponHash,

    // 兑换前置条件
    #[error("Insufficient points. Need {required} to redeem.")]
    InsufficientPoints { required: i64, actual: i64 },

    #[error("You can hold up to {limit} active coupons at a time. Please use one before generating more.")]
    CouponLimitReached { limit: usize },

    // 志愿者
    #[error("You have already joined this NGO")]
    DuplicateVolunteer,

    // 系统
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// 领域层 Result 类型别名
pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    /// 稳定错误码，客户端据此做条件分支
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidBrand(_) => "INVALID_BRAND",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ReportNotFound(_) => "REPORT_NOT_FOUND",
            Self::CouponNotFound(_) => "COUPON_NOT_FOUND",
            Self::NgoNotFound(_) => "NGO_NOT_FOUND",
            Self::EmailTaken(_) => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::CouponAlreadyUsed(_) => "COUPON_ALREADY_USED",
            Self::InvalidCouponHash => "INVALID_COUPON_HASH",
            Self::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            Self::CouponLimitReached { .. } => "COUPON_LIMIT_REACHED",
            Self::DuplicateVolunteer => "DUPLICATE_VOLUNTEER",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
