//! 响应投影
//!
//! SafeUser 是 User 去除口令哈希的投影，所有返回用户的端点都必须
//! 经过它，确保凭据不出现在任何响应里。

use bingo_core::{
    Coupon, MilestoneStatus, Ngo, NgoView, Role, Tier, User, UserSummary,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// 去除凭据的用户视图
#[derive(Debug, Clone, Serialize)]
pub struct SafeUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub points: i64,
    pub total_earned_points: i64,
    pub badges: Vec<String>,
    #[serde(rename = "adoptedStreet")]
    pub adopted_street: Option<String>,
    pub milestone_status: MilestoneStatus,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            points: user.points,
            total_earned_points: user.total_earned_points,
            badges: user.badges.clone(),
            adopted_street: user.adopted_street.clone(),
            milestone_status: user.milestone_status,
        }
    }
}

/// 登录 / 注册响应里的用户，附其全部优惠券
#[derive(Debug, Serialize)]
pub struct UserWithCoupons {
    #[serde(flatten)]
    pub user: SafeUser,
    pub coupons: Vec<Coupon>,
}

/// 用户列表 / 排行榜条目
#[derive(Debug, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: SafeUser,
    #[serde(rename = "rptCount")]
    pub report_count: usize,
    #[serde(rename = "couponCount", skip_serializing_if = "Option::is_none")]
    pub coupon_count: Option<usize>,
}

impl UserWithStats {
    pub fn from_summary(summary: &UserSummary, with_coupons: bool) -> Self {
        Self {
            user: SafeUser::from(&summary.user),
            report_count: summary.report_count,
            coupon_count: with_coupons.then_some(summary.coupon_count),
        }
    }
}

/// 等级折扣区间
#[derive(Debug, Serialize)]
pub struct DiscountRange {
    pub min: u8,
    pub max: u8,
    pub tier: Tier,
    pub milestone: i64,
}

/// NGO 及推导统计
#[derive(Debug, Serialize)]
pub struct NgoWithStats {
    #[serde(flatten)]
    pub ngo: Ngo,
    #[serde(rename = "volunteerCount")]
    pub volunteer_count: usize,
    #[serde(rename = "donationTotal")]
    pub donation_total: i64,
}

impl From<NgoView> for NgoWithStats {
    fn from(view: NgoView) -> Self {
        Self {
            ngo: view.ngo,
            volunteer_count: view.volunteer_count,
            donation_total: view.donation_total,
        }
    }
}

/// 用户已加入的 NGO，附报名时间
#[derive(Debug, Serialize)]
pub struct JoinedNgo {
    #[serde(flatten)]
    pub ngo: Ngo,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
}

/// 捐赠回执
#[derive(Debug, Serialize)]
pub struct ReceiptBody {
    #[serde(rename = "receiptNo")]
    pub receipt_no: String,
    #[serde(rename = "txnId")]
    pub txn_id: String,
    pub amount: i64,
    #[serde(rename = "ngoName")]
    pub ngo_name: String,
    pub date: DateTime<Utc>,
}
