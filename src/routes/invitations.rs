//! Channel invitation routes.

use axum::extract::State;
use serde::Deserialize;
use serde_json::json;

use super::api::{ApiJson, ApiResult, success};
use super::auth::AuthUser;
use crate::services::invitation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendInviteBody {
    pub username: String,
    pub channel_name: String,
}

#[derive(Deserialize)]
pub struct RespondBody {
    pub invitation_id: i64,
    pub accept: bool,
}

/// `POST /api/invite/send`
pub async fn send_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<SendInviteBody>,
) -> ApiResult {
    let invitation_id = invitation::send(
        &state.pool,
        state.bot_id,
        auth.user.id,
        &auth.user.username,
        &body.username,
        &body.channel_name,
    )
    .await?;
    Ok(success(json!({ "invitation_id": invitation_id, "message": "Invitation sent" })))
}

/// `POST /api/invite/respond`: only the invitee, only while pending.
pub async fn respond_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<RespondBody>,
) -> ApiResult {
    let notice = invitation::respond(&state.pool, state.bot_id, auth.user.id, body.invitation_id, body.accept).await?;
    Ok(success(json!({ "message": notice })))
}
