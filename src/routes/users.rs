//! User search route.

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::json;

use super::api::{ApiResult, success};
use super::auth::AuthUser;
use crate::services::account;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/search_users?q=`: blank queries return an empty list.
pub async fn search_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> ApiResult {
    let q = query.q.trim();
    if q.is_empty() {
        return Ok(success(json!({ "users": [] })));
    }

    let users = account::search_users(&state.pool, q, &[auth.user.id, state.bot_id]).await?;
    Ok(success(json!({ "users": users })))
}
