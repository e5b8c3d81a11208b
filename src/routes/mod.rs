//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! HTML pages, the JSON API under `/api`, and static assets under `/static`
//! share a single Axum router. Responses are gzip-compressed and every
//! request is traced.

pub mod admin;
pub mod api;
pub mod auth;
pub mod chats;
pub mod flash;
pub mod invitations;
pub mod messages;
pub mod pages;
pub mod users;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/main", get(pages::main_page))
        .route("/settings", get(pages::settings_page))
        .route("/admin", get(pages::admin_page))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/create_chat", post(chats::create_chat))
        .route("/api/user_chats", get(chats::user_chats))
        .route("/api/search_users", get(users::search_users))
        .route("/api/send_message", post(messages::send_message))
        .route("/api/messages/{receiver_id}", get(messages::get_messages))
        .route("/api/invite/send", post(invitations::send_invite))
        .route("/api/invite/respond", post(invitations::respond_invite))
        .route("/api/admin/user_info/{username}", get(admin::user_info))
        .route("/api/admin/give_glass", post(admin::give_glass))
        .route("/api/admin/give_glass_all", post(admin::give_glass_all))
        .route("/api/admin/ban_user", post(admin::ban_user))
        .route("/api/admin/unban_user", post(admin::unban_user))
        .route("/api/admin/change_password", post(admin::change_password))
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(page_routes())
        .merge(api_routes())
        .route("/healthz", get(healthz))
        .nest_service("/static", static_dir)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
