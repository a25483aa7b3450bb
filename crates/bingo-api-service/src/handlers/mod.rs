//! REST API 处理器

pub mod admin;
pub mod auth;
pub mod ngos;
pub mod reports;
pub mod rewards;
pub mod users;
