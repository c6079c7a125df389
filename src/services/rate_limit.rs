// src/services/rate_limit.rs
// DOCUMENTATION: Per-client throttling of credential endpoints

use crate::errors::TravelError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Keyed limiter for login, signup and resend-verification
pub struct AuthRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl AuthRateLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let burst = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(burst)),
        }
    }

    /// Consume one request for `client`
    pub fn check(&self, client: &str) -> Result<(), TravelError> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            log::warn!("Rate limit exceeded for {}", client);
            TravelError::RateLimitExceeded
        })
    }

    /// Drop state for clients whose quota has fully replenished
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Start background cleanup task
pub fn start_rate_limit_cleanup(limiter: Arc<AuthRateLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            limiter.cleanup();
            log::debug!("Rate limiter tracking {} clients", limiter.tracked_clients());
        }
    });
}
