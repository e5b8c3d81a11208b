use std::sync::Arc;

use gslase::config::Config;
use gslase::page::{TracingSink, script};
use gslase::{db, render, routes, services, state};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");

    // Dry-run the page script against the settings markup.
    let preview = script::load(render::settings_template(), Arc::new(TracingSink));
    if preview.document().first_select().is_none() {
        tracing::warn!("settings page has no theme select");
    }

    let pool = db::init_pool(&config.database_url, config.max_connections)
        .await
        .expect("database init failed");
    let bot_id = services::bootstrap::seed_system_accounts(&pool, &config)
        .await
        .expect("account bootstrap failed");

    let addr = config.listen_addr();
    let state = state::AppState::new(pool, config, bot_id);

    // Spawn background session sweeper.
    let _sweeper = services::sweeper::spawn_session_sweeper(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, "gslase listening");
    axum::serve(listener, app).await.expect("server failed");
}
