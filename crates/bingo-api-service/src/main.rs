//! BIN-GO API 服务入口
//!
//! 加载配置、初始化日志与文档存储，组装路由后启动 HTTP 服务。

use std::sync::Arc;

use axum::http::HeaderValue;
use bingo_api_service::state::AppState;
use bingo_core::{BingoDocument, RewardLedger, seed};
use bingo_shared::{config::AppConfig, observability, store::JsonStore};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 统一加载配置：config/default.toml + config/{env}.toml + 环境变量覆盖
    let config = AppConfig::load("bingo-api-service").unwrap_or_default();

    observability::init(&config.observability)?;

    info!("Starting bingo-api-service on {}", config.server_addr());

    // 打开文档存储：文件不存在时以空文档起步，随后播种演示数据
    let store = JsonStore::open(&config.store.path, BingoDocument::default)?;
    seed::initialize(&store)?;
    info!("Document store ready at {}", store.path().display());

    // 生产环境必须通过环境变量注入券密钥，开发环境使用默认值
    if config.is_production() && config.rewards.coupon_secret == "cleancity-secret-2024" {
        warn!("Using default coupon secret - set BINGO_REWARDS_COUPON_SECRET for production");
    }

    let ledger = Arc::new(RewardLedger::new(store, config.rewards.clone()));
    let state = AppState::new(ledger);

    // CORS 配置：通过 BINGO_CORS_ORIGINS 环境变量控制允许的来源
    // 默认允许本地开发地址，生产环境应设置为实际域名
    let allowed_origins = std::env::var("BINGO_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

    let cors = if allowed_origins == "*" {
        if config.is_production() {
            warn!("BINGO_CORS_ORIGINS=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("CORS allowed_origins: {}", allowed_origins);
        let origins: Vec<_> = allowed_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = bingo_api_service::app(state).layer(cors);

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时停止接收新连接，
    // 等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
