//! 实体 ID 生成
//!
//! 沿用「短前缀 + UUID 片段」的 ID 形态（如 u3f9a1c2e、cpn7d04b6ef），
//! 前缀标识实体类型，便于日志排查。

use uuid::Uuid;

/// 生成带前缀的短 ID：前缀 + UUID v4 的前 8 个 hex 字符
pub fn short_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &uuid[..8])
}
