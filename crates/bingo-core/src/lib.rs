//! BIN-GO 领域核心
//!
//! 包含数据模型、错误类型、积分里程碑与优惠券规则，
//! 以及对单文档存储执行全部业务操作的 RewardLedger 组件。

pub mod accounts;
pub mod admin;
pub mod coupon;
pub mod error;
pub mod ledger;
pub mod model;
pub mod ngo;
pub mod reports;
pub mod seed;
pub mod tier;

pub use accounts::{AccountSnapshot, UserSummary};
pub use admin::{CouponOverview, CouponStats};
pub use error::{LedgerError, Result};
pub use ledger::{CreditOutcome, RedeemOutcome, RewardLedger, RewardStatus};
pub use ngo::{
    DonationOutcome, DonationReceipt, DonationRequest, NgoView, VolunteerApplication,
    VolunteerOutcome,
};
pub use reports::{NewReport, SubmitOutcome};
pub use model::{
    BingoDocument, Coupon, Donation, MilestoneStatus, Ngo, PointsHistoryEntry, Report,
    ReportStatus, Role, Tier, User, VolunteerEntry, WasteType,
};
