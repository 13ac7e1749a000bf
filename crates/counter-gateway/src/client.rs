//! Gateway client
//!
//! Keeps the bot connected: runs connections back to back, resuming where
//! possible and backing off while the gateway is unreachable.

use std::time::{Duration, Instant};

use counter_common::PlatformConfig;
use counter_service::BotContext;
use rand::Rng;
use tracing::{info, warn};

use crate::connection::{run_connection, Disconnect, Session};
use crate::error::{GatewayError, GatewayResult};

/// Base delay of the reconnect backoff
const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound of the reconnect backoff
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Failed attempts in a row before the bot gives up
const MAX_CONSECUTIVE_FAILURES: u32 = 10;

/// A connection that lived this long resets the backoff
const STABLE_CONNECTION: Duration = Duration::from_secs(60);

/// Gateway client
pub struct GatewayClient<'a> {
    ctx: &'a BotContext,
    config: &'a PlatformConfig,
    session: Session,
}

impl<'a> GatewayClient<'a> {
    pub fn new(ctx: &'a BotContext, config: &'a PlatformConfig) -> Self {
        Self {
            ctx,
            config,
            session: Session::new(),
        }
    }

    /// Stay connected until a fatal error occurs
    pub async fn run(mut self) -> GatewayResult<()> {
        let mut failures = 0;

        loop {
            let url = self.session.connect_url(&self.config.gateway_url);
            let started = Instant::now();

            let result =
                run_connection(self.ctx, &self.config.token, &url, &mut self.session).await;
            if started.elapsed() >= STABLE_CONNECTION {
                failures = 0;
            }

            let delay = match result {
                Ok(Disconnect::Resume) => RECONNECT_BASE_DELAY,
                Ok(Disconnect::Reidentify) => reidentify_delay(),
                Err(e) if e.is_transient() => {
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_FAILURES {
                        return Err(GatewayError::ReconnectExhausted(failures));
                    }
                    warn!(error = %e, attempt = failures, "Gateway connection failed");
                    backoff_delay(failures)
                }
                Err(e) => return Err(e),
            };

            info!(delay_ms = delay.as_millis() as u64, "Reconnecting to gateway");
            tokio::time::sleep(delay).await;
        }
    }
}

/// Exponential backoff for the `attempt`-th failure in a row
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    RECONNECT_BASE_DELAY
        .saturating_mul(factor)
        .min(RECONNECT_MAX_DELAY)
}

/// Random wait of one to five seconds before identifying again
fn reidentify_delay() -> Duration {
    Duration::from_millis(rand::thread_rng().gen_range(1_000..=5_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(4), Duration::from_secs(8));
        assert_eq!(backoff_delay(7), RECONNECT_MAX_DELAY);
        assert_eq!(backoff_delay(40), RECONNECT_MAX_DELAY);
    }

    #[test]
    fn test_reidentify_delay_range() {
        for _ in 0..100 {
            let delay = reidentify_delay();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay <= Duration::from_secs(5));
        }
    }
}
