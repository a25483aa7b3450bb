//! 请求体定义
//!
//! 字段名与既有客户端保持一致（camelCase），结构性校验用 validator，
//! 业务规则校验（品牌白名单、积分门槛等）在领域层完成。

use bingo_core::{ReportStatus, WasteType};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[serde(rename = "userId")]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, max = 200, message = "Area is required"))]
    pub area: String,
    #[serde(rename = "wasteType")]
    pub waste_type: WasteType,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReportStatusRequest {
    pub status: ReportStatus,
}

#[derive(Debug, Deserialize)]
pub struct AdoptStreetRequest {
    pub street: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddPointsRequest {
    pub points: i64,
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RedeemRequest {
    #[serde(rename = "userId")]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UseCouponRequest {
    #[serde(rename = "userId")]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "Coupon hash is required"))]
    pub hash: String,
}

#[derive(Debug, Deserialize)]
pub struct VolunteerRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub availability: String,
}

#[derive(Debug, Deserialize)]
pub struct DonateRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub amount: i64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
    #[serde(rename = "donorName")]
    pub donor_name: Option<String>,
    #[serde(rename = "donorEmail")]
    pub donor_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MyNgosQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
}
