//! Administrator operations: user lookup, balances, bans, password resets.
//!
//! Only the `@` account is an administrator. Handlers check that before
//! calling anything here.

use sqlx::{PgPool, Row};

use super::account::{ADMIN_USERNAME, AccountError};
use super::session::{self, SessionUser};
use super::{iso8601, password};

/// Postgres `numeric_value_out_of_range`, raised when a balance overflows `BIGINT`.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// A balance update that overflows is a bad amount, not a server fault.
fn amount_overflow(err: sqlx::Error) -> AccountError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => AccountError::InvalidAmount,
        _ => AccountError::Db(err),
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub glass_balance: i64,
    pub is_banned: bool,
    pub created_at: Option<String>,
}

#[must_use]
pub fn is_admin(user: &SessionUser) -> bool {
    user.username == ADMIN_USERNAME
}

/// Parse an amount given as a JSON integer or a numeric string.
#[must_use]
pub fn parse_amount(raw: &serde_json::Value) -> Option<i64> {
    match raw {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// # Errors
///
/// Returns `NotFound` for unknown usernames or a database error.
pub async fn user_info(pool: &PgPool, username: &str) -> Result<UserInfo, AccountError> {
    let row = sqlx::query("SELECT username, email, glass_balance, is_banned, created_at FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AccountError::NotFound(username.to_owned()))?;

    let created_at: Option<time::OffsetDateTime> = row.get("created_at");
    Ok(UserInfo {
        username: row.get("username"),
        email: row.get("email"),
        glass_balance: row.get("glass_balance"),
        is_banned: row.get("is_banned"),
        created_at: created_at.map(iso8601),
    })
}

/// Add `amount` (may be negative) to one user's balance. Returns the new balance.
///
/// # Errors
///
/// Returns `NotFound` for unknown usernames, `InvalidAmount` when the balance
/// would overflow, or a database error.
pub async fn give_glass(pool: &PgPool, username: &str, amount: i64) -> Result<i64, AccountError> {
    sqlx::query_scalar("UPDATE users SET glass_balance = glass_balance + $1 WHERE username = $2 RETURNING glass_balance")
        .bind(amount)
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(amount_overflow)?
        .ok_or_else(|| AccountError::NotFound(username.to_owned()))
}

/// Add a positive `amount` to every account except the bot. Returns how many changed.
///
/// # Errors
///
/// Returns `InvalidAmount` unless `amount > 0` or when any balance would
/// overflow, or a database error.
pub async fn give_glass_all(pool: &PgPool, bot_id: i64, amount: i64) -> Result<u64, AccountError> {
    if amount <= 0 {
        return Err(AccountError::InvalidAmount);
    }
    let result = sqlx::query("UPDATE users SET glass_balance = glass_balance + $1 WHERE id <> $2")
        .bind(amount)
        .bind(bot_id)
        .execute(pool)
        .await
        .map_err(amount_overflow)?;
    Ok(result.rows_affected())
}

/// Ban or unban a user. Banning also revokes every session the user holds.
///
/// # Errors
///
/// Returns `NotFound` for unknown usernames or a database error.
pub async fn set_banned(pool: &PgPool, username: &str, banned: bool) -> Result<(), AccountError> {
    let mut tx = pool.begin().await?;
    let user_id: i64 = sqlx::query_scalar("UPDATE users SET is_banned = $1 WHERE username = $2 RETURNING id")
        .bind(banned)
        .bind(username)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| AccountError::NotFound(username.to_owned()))?;

    if banned {
        let revoked = session::delete_user_sessions(tx.as_mut(), user_id).await?;
        tracing::info!(user_id, revoked, "user banned");
    } else {
        tracing::info!(user_id, "user unbanned");
    }
    tx.commit().await?;
    Ok(())
}

/// Replace a user's password.
///
/// # Errors
///
/// Returns `EmptyPassword`, `NotFound`, or a database error.
pub async fn change_password(pool: &PgPool, username: &str, new_password: &str) -> Result<(), AccountError> {
    if new_password.is_empty() {
        return Err(AccountError::EmptyPassword);
    }
    let hash = password::hash_password(new_password)?;
    let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE username = $2")
        .bind(&hash)
        .bind(username)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AccountError::NotFound(username.to_owned()));
    }
    Ok(())
}
