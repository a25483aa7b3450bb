//! 管理端聚合视图：优惠券分析与排行榜
//!
//! 全部为只读聚合，扫描当前文档即时计算，不维护任何物化计数。

use chrono::Utc;

use crate::{accounts::UserSummary, ledger::RewardLedger, model::Coupon};

/// 排行榜条数上限
pub const LEADERBOARD_LIMIT: usize = 20;

/// 优惠券运营统计
#[derive(Debug, Clone, Default)]
pub struct CouponStats {
    pub total: usize,
    pub used: usize,
    pub active: usize,
    pub expired: usize,
    pub total_discount: i64,
    pub avg_discount: i64,
}

/// 全量券列表（按时间倒序）加统计
#[derive(Debug, Clone)]
pub struct CouponOverview {
    pub coupons: Vec<Coupon>,
    pub stats: CouponStats,
}

impl RewardLedger {
    /// 优惠券总览
    ///
    /// active / expired 只统计未使用的券：已用券既不活跃也不算过期。
    pub fn coupon_overview(&self) -> CouponOverview {
        let now = Utc::now();
        self.store().read(|doc| {
            let mut coupons = doc.coupons.clone();
            coupons.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            let total = coupons.len();
            let used = coupons.iter().filter(|c| c.used).count();
            let active = coupons.iter().filter(|c| c.is_active(now)).count();
            let expired = coupons
                .iter()
                .filter(|c| !c.used && c.expires_at <= now)
                .count();
            let total_discount: i64 = coupons.iter().map(|c| c.discount_pct as i64).sum();
            let avg_discount = if total > 0 {
                (total_discount as f64 / total as f64).round() as i64
            } else {
                0
            };

            CouponOverview {
                coupons,
                stats: CouponStats {
                    total,
                    used,
                    active,
                    expired,
                    total_discount,
                    avg_discount,
                },
            }
        })
    }

    /// 按累计获得积分降序的前 20 名用户
    pub fn leaderboard(&self) -> Vec<UserSummary> {
        let mut summaries = self.user_summaries();
        summaries.sort_by(|a, b| b.user.total_earned_points.cmp(&a.user.total_earned_points));
        summaries.truncate(LEADERBOARD_LIMIT);
        summaries
    }
}
