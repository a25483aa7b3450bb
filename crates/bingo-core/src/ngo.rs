//! 合作 NGO：志愿者报名与沙箱捐赠
//!
//! 志愿者数与捐赠总额从报名 / 捐赠集合实时推导，不写回 NGO 记录。
//! 捐赠走沙箱支付，恒为 success，每 ₹10 折算 1 积分。

use bingo_shared::ids::short_id;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    error::{LedgerError, Result},
    ledger::RewardLedger,
    model::{Donation, Ngo, VolunteerEntry},
};

/// NGO 及其推导出的社区统计
#[derive(Debug, Clone)]
pub struct NgoView {
    pub ngo: Ngo,
    pub volunteer_count: usize,
    pub donation_total: i64,
}

/// 志愿者报名表单
#[derive(Debug, Clone)]
pub struct VolunteerApplication {
    pub user_id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub skills: String,
    pub availability: String,
}

/// 报名结果
#[derive(Debug, Clone)]
pub struct VolunteerOutcome {
    pub volunteer: VolunteerEntry,
    pub new_points: Option<i64>,
    pub milestone_unlocked: Option<i64>,
}

/// 捐赠请求
#[derive(Debug, Clone)]
pub struct DonationRequest {
    pub user_id: Option<String>,
    pub amount: i64,
    pub payment_method: Option<String>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
}

/// 捐赠回执
#[derive(Debug, Clone)]
pub struct DonationReceipt {
    pub receipt_no: String,
    pub txn_id: String,
    pub amount: i64,
    pub ngo_name: String,
    pub date: DateTime<Utc>,
}

/// 捐赠结果
#[derive(Debug, Clone)]
pub struct DonationOutcome {
    pub donation: Donation,
    pub receipt: DonationReceipt,
    pub impact_message: String,
    pub points_earned: i64,
    pub milestone_unlocked: Option<i64>,
}

fn view_of(ngo: &Ngo, volunteers: &[VolunteerEntry], donations: &[Donation]) -> NgoView {
    NgoView {
        ngo: ngo.clone(),
        volunteer_count: volunteers.iter().filter(|v| v.ngo_id == ngo.id).count(),
        donation_total: donations
            .iter()
            .filter(|d| d.ngo_id == ngo.id && d.status == "success")
            .map(|d| d.amount)
            .sum(),
    }
}

impl RewardLedger {
    /// 全部 NGO 及推导统计
    pub fn list_ngos(&self) -> Vec<NgoView> {
        self.store().read(|doc| {
            doc.ngos
                .iter()
                .map(|n| view_of(n, &doc.ngo_volunteers, &doc.ngo_donations))
                .collect()
        })
    }

    /// 单个 NGO
    pub fn get_ngo(&self, ngo_id: &str) -> Result<NgoView> {
        self.store().read(|doc| {
            doc.ngos
                .iter()
                .find(|n| n.id == ngo_id)
                .map(|n| view_of(n, &doc.ngo_volunteers, &doc.ngo_donations))
                .ok_or_else(|| LedgerError::NgoNotFound(ngo_id.to_string()))
        })
    }

    /// 用户已加入的 NGO，附报名时间
    pub fn my_ngos(&self, user_id: &str) -> Vec<(Ngo, DateTime<Utc>)> {
        self.store().read(|doc| {
            doc.ngo_volunteers
                .iter()
                .filter(|v| v.user_id.as_deref() == Some(user_id))
                .filter_map(|v| {
                    doc.ngos
                        .iter()
                        .find(|n| n.id == v.ngo_id)
                        .map(|n| (n.clone(), v.joined_at))
                })
                .collect()
        })
    }

    /// 以志愿者身份加入 NGO
    ///
    /// 同一邮箱对同一 NGO 只能报名一次。已登录用户获得一次性
    /// 志愿者积分；匿名报名照常落库，只是不加分。
    pub fn join_volunteer(
        &self,
        ngo_id: &str,
        application: VolunteerApplication,
    ) -> Result<VolunteerOutcome> {
        let required = [
            &application.full_name,
            &application.email,
            &application.phone,
            &application.city,
            &application.skills,
            &application.availability,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(LedgerError::Validation(
                "All fields are required".to_string(),
            ));
        }

        let now = Utc::now();
        let bonus = self.policy().volunteer_bonus_points;

        let outcome = self.store().mutate(|doc| {
            let ngo = doc
                .ngos
                .iter()
                .find(|n| n.id == ngo_id)
                .ok_or_else(|| LedgerError::NgoNotFound(ngo_id.to_string()))?;
            let ngo_name = ngo.name.clone();

            let duplicate = doc
                .ngo_volunteers
                .iter()
                .any(|v| v.ngo_id == ngo_id && v.email == application.email);
            if duplicate {
                return Err(LedgerError::DuplicateVolunteer);
            }

            let volunteer = VolunteerEntry {
                id: short_id("vol"),
                ngo_id: ngo_id.to_string(),
                ngo_name: ngo_name.clone(),
                user_id: application.user_id.clone(),
                full_name: application.full_name.clone(),
                email: application.email.clone(),
                phone: application.phone.clone(),
                city: application.city.clone(),
                skills: application.skills.clone(),
                availability: application.availability.clone(),
                status: "active".to_string(),
                joined_at: now,
            };
            doc.ngo_volunteers.push(volunteer.clone());

            let mut new_points = None;
            let mut milestone = None;
            if let Some(user_id) = &application.user_id {
                if doc.user(user_id).is_some() {
                    let credit = Self::apply_credit(
                        doc,
                        user_id,
                        bonus,
                        &format!("Joined NGO: {}", ngo_name),
                        "ngo_volunteer",
                        now,
                    )?;
                    new_points = Some(credit.new_points);
                    milestone = credit.milestone_unlocked;
                }
            }

            Ok(VolunteerOutcome {
                volunteer,
                new_points,
                milestone_unlocked: milestone,
            })
        })?;

        info!(ngo_id, volunteer_id = %outcome.volunteer.id, "volunteer joined");
        Ok(outcome)
    }

    /// 沙箱捐赠
    ///
    /// 金额必须为正。落库、积分折算与回执生成在同一次落盘内完成。
    pub fn donate(&self, ngo_id: &str, request: DonationRequest) -> Result<DonationOutcome> {
        if request.amount <= 0 {
            return Err(LedgerError::Validation(
                "Invalid donation amount".to_string(),
            ));
        }

        let now = Utc::now();
        let rupees_per_point = self.policy().donation_rupees_per_point;
        let (txn_id, receipt_no) = {
            let mut rng = self.rng_lock();
            let mut bytes = [0u8; 6];
            rng.fill_bytes(&mut bytes);
            let hex: String = bytes.iter().map(|b| format!("{:02X}", b)).collect();
            (format!("TXN{}", hex), format!("REC-{}", now.timestamp_millis()))
        };

        let outcome = self.store().mutate(|doc| {
            let ngo = doc
                .ngos
                .iter()
                .find(|n| n.id == ngo_id)
                .ok_or_else(|| LedgerError::NgoNotFound(ngo_id.to_string()))?;
            let ngo_name = ngo.name.clone();

            let donation = Donation {
                id: short_id("don"),
                ngo_id: ngo_id.to_string(),
                ngo_name: ngo_name.clone(),
                user_id: request.user_id.clone(),
                donor_name: request
                    .donor_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "Anonymous".to_string()),
                donor_email: request.donor_email.clone().unwrap_or_default(),
                amount: request.amount,
                currency: "INR".to_string(),
                payment_method: request
                    .payment_method
                    .clone()
                    .unwrap_or_else(|| "sandbox".to_string()),
                txn_id: txn_id.clone(),
                receipt_no: receipt_no.clone(),
                status: "success".to_string(),
                created_at: now,
            };
            doc.ngo_donations.push(donation.clone());

            let points_earned = request.amount / rupees_per_point;
            let mut milestone = None;
            if let Some(user_id) = &request.user_id {
                if points_earned > 0 && doc.user(user_id).is_some() {
                    let credit = Self::apply_credit(
                        doc,
                        user_id,
                        points_earned,
                        &format!("Donated ₹{} to {}", request.amount, ngo_name),
                        "ngo_donation",
                        now,
                    )?;
                    milestone = credit.milestone_unlocked;
                }
            }

            // ₹10 约清理 0.4kg 垃圾
            let waste_kg = (request.amount as f64 / 10.0) * 0.4;
            let impact_message = format!(
                "Your ₹{} helps clean approximately {:.1}kg of waste!",
                request.amount, waste_kg
            );

            Ok::<_, LedgerError>(DonationOutcome {
                receipt: DonationReceipt {
                    receipt_no: donation.receipt_no.clone(),
                    txn_id: donation.txn_id.clone(),
                    amount: donation.amount,
                    ngo_name,
                    date: now,
                },
                donation,
                impact_message,
                points_earned,
                milestone_unlocked: milestone,
            })
        })?;

        info!(
            ngo_id,
            donation_id = %outcome.donation.id,
            amount = outcome.donation.amount,
            points_earned = outcome.points_earned,
            "donation recorded"
        );
        Ok(outcome)
    }

    /// 用户的捐赠历史，按时间倒序
    pub fn donations_for(&self, user_id: &str) -> Vec<Donation> {
        self.store().read(|doc| {
            let mut donations: Vec<Donation> = doc
                .ngo_donations
                .iter()
                .filter(|d| d.user_id.as_deref() == Some(user_id))
                .cloned()
                .collect();
            donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            donations
        })
    }

    /// 用户的志愿者报名历史，按时间倒序
    pub fn volunteer_entries_for(&self, user_id: &str) -> Vec<VolunteerEntry> {
        self.store().read(|doc| {
            let mut entries: Vec<VolunteerEntry> = doc
                .ngo_volunteers
                .iter()
                .filter(|v| v.user_id.as_deref() == Some(user_id))
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));
            entries
        })
    }
}
