//! HTML page routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use super::auth::AuthUser;
use super::flash::{self, Flash};
use crate::render;
use crate::services::{account, admin, invitation, message};
use crate::state::AppState;

fn page_error(err: &sqlx::Error, page: &'static str) -> Response {
    tracing::error!(error = %err, page, "page load failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// `GET /`
pub async fn index() -> Redirect {
    Redirect::to("/login")
}

/// `GET /main`: the user's messages and pending invitations.
pub async fn main_page(State(state): State<AppState>, auth: AuthUser, jar: CookieJar) -> Response {
    let messages = match message::inbox(&state.pool, auth.user.id).await {
        Ok(m) => m,
        Err(e) => return page_error(&e, "main"),
    };
    let invitations = match invitation::pending_for(&state.pool, auth.user.id).await {
        Ok(i) => i,
        Err(e) => return page_error(&e, "main"),
    };

    let (jar, notice) = flash::take(jar);
    let html = render::main_page(
        &auth.user,
        admin::is_admin(&auth.user),
        &messages,
        &invitations,
        notice.map(Flash::message),
    );
    (jar, Html(html)).into_response()
}

/// `GET /settings`
pub async fn settings_page(auth: AuthUser, jar: CookieJar) -> impl IntoResponse {
    let (jar, notice) = flash::take(jar);
    (jar, Html(render::settings_page(&auth.user, notice.map(Flash::message))))
}

/// `GET /admin`: user table for the administrator; everyone else is sent
/// back to `/main` with an access-denied notice.
pub async fn admin_page(State(state): State<AppState>, auth: AuthUser, jar: CookieJar) -> Response {
    if !admin::is_admin(&auth.user) {
        tracing::warn!(user_id = auth.user.id, "non-admin requested admin page");
        let jar = flash::set(jar, Flash::AccessDenied, state.config.cookie_secure);
        return (jar, Redirect::to("/main")).into_response();
    }

    match account::list_users(&state.pool).await {
        Ok(users) => Html(render::admin_page(&auth.user, &users)).into_response(),
        Err(e) => page_error(&e, "admin"),
    }
}
