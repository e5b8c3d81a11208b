//! Background sweeper: periodic cleanup of expired sessions.
//!
//! DESIGN
//! ======
//! A background task wakes every `SESSION_SWEEP_SECS`, deletes sessions past
//! their expiry, and drops idle rate-limiter keys. Failures are logged and
//! retried on the next tick.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::services::session;
use crate::state::AppState;

/// Spawn the sweeper task. Returns a handle for shutdown.
pub fn spawn_session_sweeper(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(state.config.session_sweep);
        loop {
            interval.tick().await;
            sweep(&state).await;
        }
    })
}

async fn sweep(state: &AppState) {
    state.login_limiter.prune_idle();
    state.message_limiter.prune_idle();

    match session::purge_expired(&state.pool).await {
        Ok(0) => {}
        Ok(removed) => info!(removed, "expired sessions purged"),
        Err(e) => error!(error = %e, "session sweep failed"),
    }
}
