//! 数据模型
//!
//! 所有实体由单个 JSON 文档持有。serde 字段名与既有文档模式保持一致
//! （混合 camelCase / snake_case 是历史数据格式，不做迁移）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Admin,
}

/// 里程碑状态机：locked → unlocked（积分跨越任一阈值）→ redeemed（兑换成功）
/// → 余额再次达到 500 时回到 unlocked，可重复进入，无终止状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Locked,
    Unlocked,
    Redeemed,
}

/// 奖励等级，由累计获得积分决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    None,
    Silver,
    Gold,
    Platinum,
}

/// 上报处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Escalated,
}

/// 垃圾类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WasteType {
    Plastic,
    Organic,
    #[serde(rename = "E-Waste")]
    EWaste,
    Construction,
}

impl WasteType {
    /// 每单位清理可避免的 CO₂ 排放估算（kg），服务端按类别推导，
    /// 不信任客户端上送的数值
    pub fn co2_estimate(self) -> f64 {
        match self {
            Self::Plastic => 1.2,
            Self::Organic => 2.0,
            Self::EWaste => 0.8,
            Self::Construction => 1.5,
        }
    }
}

impl std::fmt::Display for WasteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Plastic => "Plastic",
            Self::Organic => "Organic",
            Self::EWaste => "E-Waste",
            Self::Construction => "Construction",
        };
        f.write_str(label)
    }
}

/// 用户账户
///
/// password 是 bcrypt 哈希，仅存在于持久化文档中，永远不返回给调用方
/// （API 层使用去除凭据的投影）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// 当前可消费积分
    pub points: i64,
    /// 累计获得积分，只增不减
    pub total_earned_points: i64,
    pub badges: Vec<String>,
    #[serde(rename = "adoptedStreet")]
    pub adopted_street: Option<String>,
    pub milestone_status: MilestoneStatus,
}

/// 垃圾上报
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub area: String,
    #[serde(rename = "wasteType")]
    pub waste_type: WasteType,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub co2: f64,
    pub status: ReportStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// 折扣优惠券，仅通过兑换产生；除 used/redeemedAt 的一次性翻转外不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub brand: String,
    pub code: String,
    /// 完整性哈希，由 code + userId + 服务端密钥确定性推导
    pub hash: String,
    pub discount_pct: u8,
    pub tier: Tier,
    /// 兑换时扣减的里程碑积分值
    pub milestone: i64,
    pub used: bool,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "redeemedAt")]
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// 活跃 = 未使用且未过期
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.used && self.expires_at > now
    }
}

/// 积分流水，只追加的审计日志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsHistoryEntry {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// 带符号的积分变动，兑换扣减为负
    pub points: i64,
    pub reason: String,
    /// 来源类别标签（report / resolved / redemption / ngo_donation …），
    /// 客户端可扩展，保持开放字符串
    #[serde(rename = "type")]
    pub category: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// 合作 NGO
///
/// volunteers / totalWasteCollected 是静态宣传口径；实际志愿者数与
/// 捐赠总额从 ngo_volunteers / ngo_donations 推导，绝不冗余写回。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ngo {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "activeProjects")]
    pub active_projects: i64,
    #[serde(rename = "totalWasteCollected")]
    pub total_waste_collected: i64,
    pub volunteers: i64,
    pub causes: Vec<String>,
    pub category: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    pub established: String,
    pub verified: bool,
}

/// NGO 志愿者报名记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolunteerEntry {
    pub id: String,
    #[serde(rename = "ngoId")]
    pub ngo_id: String,
    #[serde(rename = "ngoName")]
    pub ngo_name: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub skills: String,
    pub availability: String,
    pub status: String,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
}

/// 捐赠记录（沙箱支付网关，状态恒为 success），只追加
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    #[serde(rename = "ngoId")]
    pub ngo_id: String,
    #[serde(rename = "ngoName")]
    pub ngo_name: String,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "donorName")]
    pub donor_name: String,
    #[serde(rename = "donorEmail")]
    pub donor_email: String,
    /// 卢比金额，> 0
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "txnId")]
    pub txn_id: String,
    #[serde(rename = "receiptNo")]
    pub receipt_no: String,
    pub status: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// 持久化文档：所有集合的单一属主
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BingoDocument {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
    #[serde(default)]
    pub points_history: Vec<PointsHistoryEntry>,
    #[serde(default)]
    pub ngos: Vec<Ngo>,
    #[serde(default)]
    pub ngo_volunteers: Vec<VolunteerEntry>,
    #[serde(default)]
    pub ngo_donations: Vec<Donation>,
    /// NGO 种子数据版本，低于当前种子版本时增量合并新 NGO
    #[serde(rename = "_ngo_version", default)]
    pub ngo_seed_version: i64,
}

impl BingoDocument {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn coupons_for(&self, user_id: &str) -> Vec<Coupon> {
        self.coupons
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn active_coupon_count(&self, user_id: &str, now: DateTime<Utc>) -> usize {
        self.coupons
            .iter()
            .filter(|c| c.user_id == user_id && c.is_active(now))
            .count()
    }
}
