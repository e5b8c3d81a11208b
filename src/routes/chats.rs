//! Chat thread routes.

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use super::api::{ApiJson, ApiResult, success};
use super::auth::AuthUser;
use crate::services::chat;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateChatBody {
    pub receiver_id: i64,
}

/// `POST /api/create_chat`: existing chat with the receiver, or a new one.
pub async fn create_chat(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<CreateChatBody>,
) -> ApiResult {
    let chat_id = chat::create_or_get(&state.pool, auth.user.id, body.receiver_id).await?;
    Ok(success(json!({ "chat_id": chat_id })))
}

/// `GET /api/user_chats`
pub async fn user_chats(State(state): State<AppState>, auth: AuthUser) -> ApiResult {
    let chats = chat::list_for_user(&state.pool, auth.user.id).await?;
    Ok(success(json!({ "chats": chats })))
}
