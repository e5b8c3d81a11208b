//! Administrator API. Every handler requires the caller to be the `@` account.

use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use super::api::{ApiError, ApiJson, ApiPath, ApiResult, success};
use super::auth::AuthUser;
use crate::services::account::AccountError;
use crate::services::admin;
use crate::state::AppState;

fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if admin::is_admin(&auth.user) {
        Ok(())
    } else {
        tracing::warn!(user_id = auth.user.id, "admin API denied");
        Err(ApiError::forbidden())
    }
}

fn amount_from(raw: &Value) -> Result<i64, ApiError> {
    admin::parse_amount(raw).ok_or_else(|| AccountError::InvalidAmount.into())
}

#[derive(Deserialize)]
pub struct UsernameBody {
    pub username: String,
}

#[derive(Deserialize)]
pub struct GiveGlassBody {
    pub username: String,
    pub amount: Value,
}

#[derive(Deserialize)]
pub struct GiveGlassAllBody {
    pub amount: Value,
}

#[derive(Deserialize)]
pub struct ChangePasswordBody {
    pub username: String,
    pub new_password: String,
}

/// `GET /api/admin/user_info/{username}`
pub async fn user_info(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(username): ApiPath<String>,
) -> ApiResult {
    require_admin(&auth)?;
    let user = admin::user_info(&state.pool, &username).await?;
    Ok(success(json!({ "user": user })))
}

/// `POST /api/admin/give_glass`
pub async fn give_glass(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<GiveGlassBody>,
) -> ApiResult {
    require_admin(&auth)?;
    let amount = amount_from(&body.amount)?;
    let new_balance = admin::give_glass(&state.pool, &body.username, amount).await?;
    tracing::info!(username = %body.username, amount, new_balance, "glass granted");
    Ok(success(json!({ "new_balance": new_balance })))
}

/// `POST /api/admin/give_glass_all`: every account except the bot.
pub async fn give_glass_all(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<GiveGlassAllBody>,
) -> ApiResult {
    require_admin(&auth)?;
    let amount = amount_from(&body.amount)?;
    let total_affected = admin::give_glass_all(&state.pool, state.bot_id, amount).await?;
    tracing::info!(amount, total_affected, "glass granted to all users");
    Ok(success(json!({
        "message": format!("Gave {amount} glass to {total_affected} users"),
        "total_affected": total_affected,
    })))
}

/// `POST /api/admin/ban_user`: also revokes the user's sessions.
pub async fn ban_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UsernameBody>,
) -> ApiResult {
    require_admin(&auth)?;
    admin::set_banned(&state.pool, &body.username, true).await?;
    Ok(success(json!({ "message": format!("User {} has been banned", body.username) })))
}

/// `POST /api/admin/unban_user`
pub async fn unban_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<UsernameBody>,
) -> ApiResult {
    require_admin(&auth)?;
    admin::set_banned(&state.pool, &body.username, false).await?;
    Ok(success(json!({ "message": format!("User {} has been unbanned", body.username) })))
}

/// `POST /api/admin/change_password`
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ChangePasswordBody>,
) -> ApiResult {
    require_admin(&auth)?;
    admin::change_password(&state.pool, &body.username, &body.new_password).await?;
    tracing::info!(username = %body.username, "password changed by admin");
    Ok(success(json!({ "message": format!("Password for {} has been changed", body.username) })))
}
