use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

use crate::features::sales::services::CartStore;

/// Delay between sweeps of the cart store
const SWEEP_INTERVAL_SECS: u64 = 300;

/// Background worker dropping carts nobody touched within the TTL
pub struct CartSweeper {
    carts: Arc<CartStore>,
    period: Duration,
}

impl CartSweeper {
    pub fn new(carts: Arc<CartStore>) -> Self {
        Self {
            carts,
            period: Duration::from_secs(SWEEP_INTERVAL_SECS),
        }
    }

    /// Run the sweeper in a background loop
    pub async fn run(&self) {
        tracing::info!("Starting cart sweeper worker");

        let mut interval = interval(self.period);

        loop {
            interval.tick().await;
            self.sweep().await;
        }
    }

    async fn sweep(&self) -> usize {
        let purged = self.carts.purge_expired().await;
        if purged > 0 {
            tracing::info!("Dropped {} expired carts", purged);
        }
        purged
    }
}
