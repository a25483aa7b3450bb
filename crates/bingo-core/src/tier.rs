//! 里程碑与等级规则
//!
//! 全部为纯函数：里程碑跨越检测作用于当前可消费积分，
//! 等级判定作用于累计获得积分，两者不可混用。

use crate::model::Tier;

/// 固定里程碑阈值，升序
pub const MILESTONES: [i64; 3] = [500, 1000, 2000];

/// 下一个未达到的里程碑；≥2000 时已全部解锁
pub fn next_milestone(points: i64) -> Option<i64> {
    MILESTONES.into_iter().find(|&m| points < m)
}

/// 单次积分变动是否跨越里程碑
///
/// 返回满足 old < m ≤ new 的最小阈值；一次变动跨越多个阈值时
/// 只返回最小的那个。
pub fn crossed_milestone(old_points: i64, new_points: i64) -> Option<i64> {
    MILESTONES
        .into_iter()
        .find(|&m| old_points < m && new_points >= m)
}

impl Tier {
    /// 由累计获得积分判定等级
    pub fn for_lifetime(total_earned_points: i64) -> Self {
        if total_earned_points >= 2000 {
            Self::Platinum
        } else if total_earned_points >= 1000 {
            Self::Gold
        } else if total_earned_points >= 500 {
            Self::Silver
        } else {
            Self::None
        }
    }

    /// 该等级的折扣百分比区间（闭区间，均匀采样）
    pub fn discount_range(self) -> Option<(u8, u8)> {
        match self {
            Self::None => None,
            Self::Silver => Some((30, 40)),
            Self::Gold => Some((40, 55)),
            Self::Platinum => Some((55, 70)),
        }
    }

    /// 兑换时扣减的里程碑积分值
    pub fn milestone_value(self) -> Option<i64> {
        match self {
            Self::None => None,
            Self::Silver => Some(500),
            Self::Gold => Some(1000),
            Self::Platinum => Some(2000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_milestone() {
        assert_eq!(next_milestone(0), Some(500));
        assert_eq!(next_milestone(499), Some(500));
        assert_eq!(next_milestone(500), Some(1000));
        assert_eq!(next_milestone(1999), Some(2000));
        assert_eq!(next_milestone(2000), None);
        assert_eq!(next_milestone(5000), None);
    }

    #[test]
    fn test_crossed_milestone_boundaries() {
        // 恰好落在阈值上算跨越
        assert_eq!(crossed_milestone(490, 500), Some(500));
        assert_eq!(crossed_milestone(499, 501), Some(500));
        // 未达到不算
        assert_eq!(crossed_milestone(490, 499), None);
        // 起点已在阈值上不算
        assert_eq!(crossed_milestone(500, 990), None);
        assert_eq!(crossed_milestone(999, 1000), Some(1000));
    }

    #[test]
    fn test_crossed_milestone_returns_smallest() {
        // 一次大额变动跨越多个阈值时返回最小的
        assert_eq!(crossed_milestone(0, 2500), Some(500));
        assert_eq!(crossed_milestone(600, 2100), Some(1000));
    }

    #[test]
    fn test_tier_classification() {
        assert_eq!(Tier::for_lifetime(0), Tier::None);
        assert_eq!(Tier::for_lifetime(499), Tier::None);
        assert_eq!(Tier::for_lifetime(500), Tier::Silver);
        assert_eq!(Tier::for_lifetime(999), Tier::Silver);
        assert_eq!(Tier::for_lifetime(1000), Tier::Gold);
        assert_eq!(Tier::for_lifetime(1999), Tier::Gold);
        assert_eq!(Tier::for_lifetime(2000), Tier::Platinum);
    }

    #[test]
    fn test_discount_ranges() {
        assert_eq!(Tier::None.discount_range(), None);
        assert_eq!(Tier::Silver.discount_range(), Some((30, 40)));
        assert_eq!(Tier::Gold.discount_range(), Some((40, 55)));
        assert_eq!(Tier::Platinum.discount_range(), Some((55, 70)));
    }

    #[test]
    fn test_milestone_values() {
        assert_eq!(Tier::Silver.milestone_value(), Some(500));
        assert_eq!(Tier::Gold.milestone_value(), Some(1000));
        assert_eq!(Tier::Platinum.milestone_value(), Some(2000));
        assert_eq!(Tier::None.milestone_value(), None);
    }
}
