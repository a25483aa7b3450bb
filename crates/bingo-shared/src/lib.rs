//! 共享库
//!
//! 包含各 crate 共用的配置、可观测性初始化、JSON 文档存储与 ID 生成等基础设施代码。

pub mod config;
pub mod ids;
pub mod observability;
pub mod store;
