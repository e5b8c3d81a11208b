//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the parsed configuration, the id of the
//! system bot account (resolved once at bootstrap), and the in-memory rate
//! limiters for login attempts and message sends.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::rate_limit::RateLimiter;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// User id of the `GSLASE_Bot` account that sends system messages.
    pub bot_id: i64,
    pub login_limiter: RateLimiter,
    pub message_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: Config, bot_id: i64) -> Self {
        Self {
            pool,
            login_limiter: RateLimiter::new(config.login_limit),
            message_limiter: RateLimiter::new(config.message_limit),
            config: Arc::new(config),
            bot_id,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_copies_limits_from_config() {
        let state = test_helpers::test_app_state();
        assert_eq!(state.bot_id, 1);
        assert_eq!(state.config.login_limit.limit, 10);
        for _ in 0..10 {
            assert!(state.login_limiter.check_and_record("alice").is_ok());
        }
        assert!(state.login_limiter.check_and_record("alice").is_err());
        assert!(state.message_limiter.check_and_record("1").is_ok());
    }

    #[tokio::test]
    async fn clones_share_limiters() {
        let state = test_helpers::test_app_state();
        let cloned = state.clone();
        for _ in 0..10 {
            state.login_limiter.check_and_record("bob").unwrap();
        }
        assert!(cloned.login_limiter.check_and_record("bob").is_err());
    }
}
