//! 账户：注册、登录、街道认领
//!
//! 口令使用 bcrypt 哈希存储。登录失败统一返回 InvalidCredentials，
//! 不区分「邮箱不存在」与「口令错误」。

use bingo_shared::ids::short_id;
use tracing::info;

use crate::{
    error::{LedgerError, Result},
    ledger::RewardLedger,
    model::{Coupon, MilestoneStatus, Role, User},
};

/// 用户及其全部优惠券，登录响应用
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    pub user: User,
    pub coupons: Vec<Coupon>,
}

/// 用户及按其聚合的活动计数，管理端列表用
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub user: User,
    pub report_count: usize,
    pub coupon_count: usize,
}

impl RewardLedger {
    /// 注册新用户
    ///
    /// 邮箱全局唯一；新用户从 citizen 角色、零积分、locked 状态起步。
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Result<User> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(LedgerError::Validation(
                "Name, email and password are required".to_string(),
            ));
        }

        // 哈希放在写锁外，锁内只做唯一性检查与插入
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| LedgerError::Internal(format!("password hashing failed: {}", e)))?;

        let user = self.store().mutate(|doc| {
            if doc.user_by_email(email).is_some() {
                return Err(LedgerError::EmailTaken(email.to_string()));
            }
            let user = User {
                id: short_id("u"),
                name: name.to_string(),
                email: email.to_string(),
                password: password_hash.clone(),
                role: Role::Citizen,
                points: 0,
                total_earned_points: 0,
                badges: vec![],
                adopted_street: None,
                milestone_status: MilestoneStatus::Locked,
            };
            doc.users.push(user.clone());
            Ok(user)
        })?;

        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// 凭邮箱和口令登录，成功时附带用户的全部优惠券
    pub fn login(&self, email: &str, password: &str) -> Result<AccountSnapshot> {
        let snapshot = self.store().read(|doc| {
            let user = doc
                .user_by_email(email)
                .ok_or(LedgerError::InvalidCredentials)?;
            let verified = bcrypt::verify(password, &user.password)
                .map_err(|e| LedgerError::Internal(format!("password verify failed: {}", e)))?;
            if !verified {
                return Err(LedgerError::InvalidCredentials);
            }
            Ok(AccountSnapshot {
                user: user.clone(),
                coupons: doc.coupons_for(&user.id),
            })
        })?;

        info!(user_id = %snapshot.user.id, "user logged in");
        Ok(snapshot)
    }

    /// 全部用户及其上报 / 优惠券计数
    pub fn user_summaries(&self) -> Vec<UserSummary> {
        self.store().read(|doc| {
            doc.users
                .iter()
                .map(|u| UserSummary {
                    user: u.clone(),
                    report_count: doc.reports.iter().filter(|r| r.user_id == u.id).count(),
                    coupon_count: doc.coupons.iter().filter(|c| c.user_id == u.id).count(),
                })
                .collect()
        })
    }

    /// 认领（或放弃）一条街道
    pub fn adopt_street(&self, user_id: &str, street: Option<String>) -> Result<User> {
        self.store().mutate(|doc| {
            let user = doc
                .user_mut(user_id)
                .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;
            user.adopted_street = street.clone();
            Ok(user.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BingoDocument;
    use bingo_shared::{config::RewardConfig, store::JsonStore};
    use rand::{SeedableRng, rngs::StdRng};

    fn empty_ledger() -> RewardLedger {
        let path =
            std::env::temp_dir().join(format!("bingo-accounts-{}.json", uuid::Uuid::new_v4()));
        let store = JsonStore::open(path, BingoDocument::default).unwrap();
        RewardLedger::with_rng(
            store,
            RewardConfig::default(),
            Box::new(StdRng::seed_from_u64(1)),
        )
    }

    #[test]
    fn test_signup_then_login() {
        let ledger = empty_ledger();
        let user = ledger.signup("Arjun Sharma", "arjun@demo.com", "demo123").unwrap();
        assert_eq!(user.role, Role::Citizen);
        assert_eq!(user.points, 0);
        assert_eq!(user.milestone_status, MilestoneStatus::Locked);
        // 存储的是哈希而非明文
        assert_ne!(user.password, "demo123");

        let snapshot = ledger.login("arjun@demo.com", "demo123").unwrap();
        assert_eq!(snapshot.user.id, user.id);
        assert!(snapshot.coupons.is_empty());
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let ledger = empty_ledger();
        ledger.signup("Arjun", "arjun@demo.com", "demo123").unwrap();

        let wrong_password = ledger.login("arjun@demo.com", "nope");
        let unknown_email = ledger.login("ghost@demo.com", "demo123");
        assert!(matches!(wrong_password, Err(LedgerError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(LedgerError::InvalidCredentials)));
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let ledger = empty_ledger();
        ledger.signup("Arjun", "arjun@demo.com", "demo123").unwrap();
        assert!(matches!(
            ledger.signup("Imposter", "arjun@demo.com", "other"),
            Err(LedgerError::EmailTaken(_))
        ));
    }

    #[test]
    fn test_adopt_street_roundtrip() {
        let ledger = empty_ledger();
        let user = ledger.signup("Priya", "priya@demo.com", "demo123").unwrap();

        let updated = ledger
            .adopt_street(&user.id, Some("MG Road".to_string()))
            .unwrap();
        assert_eq!(updated.adopted_street.as_deref(), Some("MG Road"));

        let cleared = ledger.adopt_street(&user.id, None).unwrap();
        assert_eq!(cleared.adopted_street, None);

        assert!(matches!(
            ledger.adopt_street("missing", None),
            Err(LedgerError::UserNotFound(_))
        ));
    }
}
