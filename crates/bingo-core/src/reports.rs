//! 垃圾上报
//!
//! 提交即时奖励 10 分，处理为 Resolved 时再奖励上报人 20 分。
//! CO₂ 估算始终由服务端按垃圾类别推导，客户端上送的数值被忽略。

use bingo_shared::ids::short_id;
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    error::{LedgerError, Result},
    ledger::RewardLedger,
    model::{Report, ReportStatus, WasteType},
};

/// 坐标缺省值（Durg Bit）
pub const DEFAULT_LAT: f64 = 21.1904;
pub const DEFAULT_LNG: f64 = 81.2849;

/// 新上报的输入
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: String,
    pub area: String,
    pub waste_type: WasteType,
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub image_url: Option<String>,
}

/// 提交上报的结果
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub report: Report,
    pub new_points: i64,
    pub milestone_unlocked: Option<i64>,
}

impl RewardLedger {
    /// 全部上报，按时间倒序
    pub fn list_reports(&self) -> Vec<Report> {
        self.store().read(|doc| {
            let mut reports = doc.reports.clone();
            reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            reports
        })
    }

    /// 提交新上报并奖励上报人
    ///
    /// 上报人必须存在，匿名上报不落库。报告与积分变动在同一次
    /// 落盘内完成，不会出现有报告无积分的中间状态。
    pub fn submit_report(&self, input: NewReport) -> Result<SubmitOutcome> {
        let now = Utc::now();
        let policy_points = self.policy().report_points;

        let outcome = self.store().mutate(|doc| {
            let user = doc
                .user(&input.user_id)
                .ok_or_else(|| LedgerError::UserNotFound(input.user_id.clone()))?;

            let report = Report {
                id: short_id("r"),
                user_id: input.user_id.clone(),
                user_name: user.name.clone(),
                area: input.area.clone(),
                waste_type: input.waste_type,
                description: input.description.clone(),
                lat: input.lat.unwrap_or(DEFAULT_LAT),
                lng: input.lng.unwrap_or(DEFAULT_LNG),
                image_url: input.image_url.clone().unwrap_or_default(),
                co2: input.waste_type.co2_estimate(),
                status: ReportStatus::Pending,
                created_at: now,
                resolved_at: None,
            };
            doc.reports.insert(0, report.clone());

            let credit = Self::apply_credit(
                doc,
                &input.user_id,
                policy_points,
                &format!("Report submitted: {} ({})", input.area, input.waste_type),
                "report",
                now,
            )?;

            Ok::<_, LedgerError>(SubmitOutcome {
                report,
                new_points: credit.new_points,
                milestone_unlocked: credit.milestone_unlocked,
            })
        })?;

        info!(
            report_id = %outcome.report.id,
            user_id = %input.user_id,
            waste_type = %input.waste_type,
            "report submitted"
        );
        Ok(outcome)
    }

    /// 更新上报状态
    ///
    /// 首次进入 Resolved 时给上报人加分并盖上 resolvedAt；重复设置
    /// Resolved 不再加分。上报人账户已不存在时跳过加分，状态更新照常生效。
    pub fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<(Report, Option<i64>)> {
        let now = Utc::now();
        let resolve_points = self.policy().resolve_points;

        let result = self.store().mutate(|doc| {
            let report = doc
                .reports
                .iter_mut()
                .find(|r| r.id == report_id)
                .ok_or_else(|| LedgerError::ReportNotFound(report_id.to_string()))?;

            let newly_resolved =
                status == ReportStatus::Resolved && report.status != ReportStatus::Resolved;
            report.status = status;
            if status == ReportStatus::Resolved {
                report.resolved_at = Some(now);
            }
            let report = report.clone();

            let mut milestone = None;
            if newly_resolved {
                match Self::apply_credit(
                    doc,
                    &report.user_id,
                    resolve_points,
                    &format!("Complaint resolved: {}", report.area),
                    "resolved",
                    now,
                ) {
                    Ok(credit) => milestone = credit.milestone_unlocked,
                    Err(LedgerError::UserNotFound(user_id)) => {
                        warn!(%user_id, report_id, "resolved report owner no longer exists");
                    }
                    Err(e) => return Err(e),
                }
            }

            Ok((report, milestone))
        })?;

        info!(report_id, status = ?result.0.status, "report status updated");
        Ok(result)
    }
}
