//! 请求 / 响应 DTO

pub mod request;
pub mod response;
