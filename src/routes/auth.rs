//! Auth routes: login, registration, logout, and the session extractor.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

use super::api::ApiError;
use super::flash::{self, Flash};
use crate::render;
use crate::services::account::{self, AccountError, Registration};
use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

const INVALID_LOGIN: &str = "Invalid username or password";
const BANNED_LOGIN: &str = "Your account has been banned";
const TOO_MANY_ATTEMPTS: &str = "Too many login attempts. Please try again later.";

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub(crate) fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

/// Why a request could not be authenticated. API paths answer with the JSON
/// error envelope, page paths with a redirect to the login form.
#[derive(Debug)]
pub enum AuthRejection {
    Api(ApiError),
    Page(StatusCode),
}

impl AuthRejection {
    fn unauthorized(path: &str) -> Self {
        if is_api_path(path) { Self::Api(ApiError::unauthorized()) } else { Self::Page(StatusCode::UNAUTHORIZED) }
    }

    fn internal(path: &str) -> Self {
        if is_api_path(path) { Self::Api(ApiError::internal()) } else { Self::Page(StatusCode::INTERNAL_SERVER_ERROR) }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Api(err) => err.into_response(),
            Self::Page(StatusCode::UNAUTHORIZED) => Redirect::to("/login").into_response(),
            Self::Page(status) => (status, "Internal server error").into_response(),
        }
    }
}

pub(crate) fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path();
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(AuthRejection::unauthorized(path));
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session validation failed");
                AuthRejection::internal(path)
            })?
            .ok_or_else(|| AuthRejection::unauthorized(path))?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginQuery {
    register: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_form(register: bool, status: StatusCode, message: &str) -> Response {
    (status, Html(render::login_page(register, Some(message)))).into_response()
}

/// Open a session for `user_id`, set the cookie, and continue to `/main`.
async fn start_session(state: &AppState, jar: CookieJar, user_id: i64, notice: Option<Flash>) -> Response {
    let token = match session::create_session(&state.pool, user_id, state.config.session_ttl_hours).await {
        Ok(t) => t,
        Err(e) => {
            tracing::error!(error = %e, user_id, "session creation failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response();
        }
    };

    let secure = state.config.cookie_secure;
    let mut jar = jar.add(session_cookie(token, secure));
    if let Some(notice) = notice {
        jar = flash::set(jar, notice, secure);
    }
    (jar, Redirect::to("/main")).into_response()
}

/// `GET /login[?register=true]`: login or registration form. Signed-in
/// users go straight to `/main`.
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> Response {
    if let Some(token) = jar.get(COOKIE_NAME).map(Cookie::value).filter(|t| !t.is_empty()) {
        if let Ok(Some(_)) = session::validate_session(&state.pool, token).await {
            return Redirect::to("/main").into_response();
        }
    }

    let register = query.register.as_deref() == Some("true");
    let (jar, notice) = flash::take(jar);
    (jar, Html(render::login_page(register, notice.map(Flash::message)))).into_response()
}

/// `POST /login`: verify credentials and start a session.
pub async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let limit_key = form.username.trim().to_lowercase();
    if let Err(e) = state.login_limiter.check_and_record(&limit_key) {
        warn!(username = %limit_key, error = %e, "login rate limited");
        return login_form(false, StatusCode::TOO_MANY_REQUESTS, TOO_MANY_ATTEMPTS);
    }

    match account::authenticate(&state.pool, &form.username, &form.password).await {
        Ok(user_id) => {
            state.login_limiter.reset(&limit_key);
            info!(user_id, "user logged in");
            start_session(&state, jar, user_id, None).await
        }
        Err(AccountError::InvalidCredentials) => login_form(false, StatusCode::UNAUTHORIZED, INVALID_LOGIN),
        Err(AccountError::Banned) => login_form(false, StatusCode::FORBIDDEN, BANNED_LOGIN),
        Err(e) => {
            let err = ApiError::from(e);
            login_form(false, err.status, &err.message)
        }
    }
}

/// `POST /register`: create the account, then sign in.
pub async fn register(State(state): State<AppState>, jar: CookieJar, Form(form): Form<Registration>) -> Response {
    match account::register(&state.pool, state.bot_id, &form).await {
        Ok(user_id) => start_session(&state, jar, user_id, Some(Flash::Registered)).await,
        Err(e) => {
            let err = ApiError::from(e);
            login_form(true, err.status, &err.message)
        }
    }
}

/// `GET /logout`: delete the session, clear the cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::error!(error = %e, user_id = auth.user.id, "session delete failed");
    }

    let secure = state.config.cookie_secure;
    let jar = flash::set(CookieJar::new().add(cleared_session_cookie(secure)), Flash::LoggedOut, secure);
    (jar, Redirect::to("/"))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
