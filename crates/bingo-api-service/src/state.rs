//! 服务共享状态

use std::sync::Arc;

use bingo_core::RewardLedger;

/// 注入所有 handler 的应用状态
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RewardLedger>,
}

impl AppState {
    pub fn new(ledger: Arc<RewardLedger>) -> Self {
        Self { ledger }
    }
}
