//! Ctrl+C shutdown coordination

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Cancels its token on Ctrl+C
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a task that cancels the token when Ctrl+C is received
    pub fn with_ctrl_c() -> Self {
        let controller = Self::new();
        let token = controller.token.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown...");
                    token.cancel();
                }
                Err(e) => {
                    warn!("Failed to listen for Ctrl+C: {}", e);
                }
            }
        });

        controller
    }

    /// Cancelled together with this controller
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub async fn wait_for_shutdown(&self) {
        self.token.cancelled().await;
    }
}
