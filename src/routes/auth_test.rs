use axum::extract::FromRequestParts;
use axum::http::{Request, header};

use super::*;
use crate::state::test_helpers::test_app_state;

fn parts_for(uri: &str, cookie: Option<&str>) -> axum::http::request::Parts {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(()).unwrap().into_parts().0
}

async fn reject(uri: &str, cookie: Option<&str>) -> AuthRejection {
    let state = test_app_state();
    let mut parts = parts_for(uri, cookie);
    let Err(rejection) = AuthUser::from_request_parts(&mut parts, &state).await else {
        panic!("expected rejection for {uri}");
    };
    rejection
}

// =============================================================================
// is_api_path
// =============================================================================

#[test]
fn api_paths_are_detected() {
    assert!(is_api_path("/api/user_chats"));
    assert!(is_api_path("/api/admin/give_glass"));
    assert!(is_api_path("/api"));
    assert!(!is_api_path("/main"));
    assert!(!is_api_path("/apiary"));
}

// =============================================================================
// AuthUser rejections
// =============================================================================

#[tokio::test]
async fn missing_cookie_on_api_is_json_401() {
    let response = reject("/api/user_chats", None).await.into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn missing_cookie_on_page_redirects_to_login() {
    let response = reject("/main", None).await.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn empty_cookie_is_rejected_without_db() {
    let rejection = reject("/settings", Some("session_token=")).await;
    assert!(matches!(rejection, AuthRejection::Page(StatusCode::UNAUTHORIZED)));
}

#[tokio::test]
async fn unrelated_cookie_is_rejected() {
    let rejection = reject("/api/messages/3", Some("flash=registered")).await;
    assert!(matches!(rejection, AuthRejection::Api(ref e) if e.status == StatusCode::UNAUTHORIZED));
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_attributes() {
    let cookie = session_cookie("abc".into(), true);
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.secure(), Some(true));
}

#[test]
fn cleared_cookie_expires_immediately() {
    let cookie = cleared_session_cookie(false);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(false));
}

#[test]
fn login_form_renders_message_with_status() {
    let response = login_form(false, StatusCode::UNAUTHORIZED, INVALID_LOGIN);
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
