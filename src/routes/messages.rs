//! Direct message routes.

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use super::api::{ApiJson, ApiPath, ApiResult, success};
use super::auth::AuthUser;
use crate::services::message;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageBody {
    pub content: String,
    pub receiver_id: i64,
}

/// `POST /api/send_message`: rate-limited per sender.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SendMessageBody>,
) -> ApiResult {
    state
        .message_limiter
        .check_and_record(&auth.user.id.to_string())
        .inspect_err(|_| tracing::warn!(user_id = auth.user.id, "message send rate limited"))?;

    let sent = message::send(&state.pool, auth.user.id, &auth.user.username, body.receiver_id, &body.content).await?;
    Ok(success(json!({ "message": sent })))
}

/// `GET /api/messages/{receiver_id}`: conversation with one user, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(receiver_id): ApiPath<i64>,
) -> ApiResult {
    let messages = message::conversation(&state.pool, auth.user.id, receiver_id).await?;
    Ok(success(json!({ "messages": messages })))
}
