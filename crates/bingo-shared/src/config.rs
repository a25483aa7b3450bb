//! 配置管理模块
//!
//! 支持多层级配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// 文档存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON 文档路径，不存在时首次启动自动播种
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "bingo-db.json".to_string(),
        }
    }
}

/// 积分与优惠券规则配置
///
/// 参考实现中志愿者加入奖励在两套实现里分别是 15 和 50，
/// 这里统一收敛为可配置项，默认取服务端的 50。
#[derive(Debug, Clone, Deserialize)]
pub struct RewardConfig {
    /// 提交上报奖励积分
    pub report_points: i64,
    /// 上报被标记为已解决时奖励积分
    pub resolve_points: i64,
    /// 加入 NGO 志愿者奖励积分
    pub volunteer_bonus_points: i64,
    /// 捐赠积分换算：每 N 卢比 1 积分
    pub donation_rupees_per_point: i64,
    /// 优惠券完整性哈希密钥
    pub coupon_secret: String,
    /// 优惠券有效期下界（天，含）
    pub coupon_expiry_min_days: i64,
    /// 优惠券有效期上界（天，含）
    pub coupon_expiry_max_days: i64,
    /// 积分流水查询条数上限
    pub history_page_size: usize,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            report_points: 10,
            resolve_points: 20,
            volunteer_bonus_points: 50,
            donation_rupees_per_point: 10,
            coupon_secret: "cleancity-secret-2024".to_string(),
            coupon_expiry_min_days: 7,
            coupon_expiry_max_days: 15,
            history_page_size: 50,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. 环境变量（BINGO_ 前缀，如 BINGO_STORE_PATH -> store.path）
    /// 4. 服务端口环境变量（如 BINGO_API_PORT）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("BINGO_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            // 环境变量覆盖（BINGO_STORE_PATH -> store.path）
            .add_source(
                Environment::with_prefix("BINGO")
                    .separator("_")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if let Some(port) = Self::service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 从环境变量获取服务特定端口
    ///
    /// 服务名到环境变量的映射规则：bingo-api-service -> BINGO_API_PORT，
    /// 其余服务回退为大写下划线格式 + _PORT。
    fn service_port_from_env(service_name: &str) -> Option<u16> {
        let env_var_name = match service_name {
            "bingo-api-service" => "BINGO_API_PORT".to_string(),
            other => format!("{}_PORT", other.to_uppercase().replace('-', "_")),
        };

        std::env::var(&env_var_name).ok().and_then(|v| v.parse().ok())
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.store.path, "bingo-db.json");
        assert_eq!(config.rewards.volunteer_bonus_points, 50);
        assert_eq!(config.rewards.coupon_expiry_min_days, 7);
        assert_eq!(config.rewards.coupon_expiry_max_days, 15);
    }

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            ..Default::default()
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_service_port_env_var_mapping() {
        // 环境变量不存在时应返回 None，不应 panic
        assert_eq!(
            AppConfig::service_port_from_env("bingo-api-service"),
            std::env::var("BINGO_API_PORT").ok().and_then(|v| v.parse().ok())
        );
        let _ = AppConfig::service_port_from_env("some-other-service");
    }
}
