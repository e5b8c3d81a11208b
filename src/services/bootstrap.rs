//! Startup seeding of the system accounts (bot and administrator).

use sqlx::PgPool;

use super::account::{ADMIN_USERNAME, AccountError, BOT_USERNAME};
use super::{password, session};
use crate::config::{Config, DEFAULT_ADMIN_PASSWORD};

const BOT_EMAIL: &str = "bot@gslase.com";
const ADMIN_EMAIL: &str = "admin@gslase.com";
const ADMIN_BALANCE: i64 = 1000;

/// Ensure the bot and admin accounts exist. Returns the bot's user id.
///
/// Existing accounts are left untouched, so a changed `ADMIN_PASSWORD`
/// only applies to a fresh database.
///
/// # Errors
///
/// Returns a hashing or database error if seeding fails.
pub async fn seed_system_accounts(pool: &PgPool, config: &Config) -> Result<i64, AccountError> {
    // Random throwaway password: the bot never logs in.
    let bot_hash = password::hash_password(&session::generate_token())?;
    sqlx::query(
        r"INSERT INTO users (username, email, password_hash, glass_balance)
          VALUES ($1, $2, $3, 0)
          ON CONFLICT (username) DO NOTHING",
    )
    .bind(BOT_USERNAME)
    .bind(BOT_EMAIL)
    .bind(&bot_hash)
    .execute(pool)
    .await?;

    let admin_password = config.admin_password.as_deref().unwrap_or_else(|| {
        tracing::warn!("ADMIN_PASSWORD not set; seeding admin account with the default password");
        DEFAULT_ADMIN_PASSWORD
    });
    let created = sqlx::query(
        r"INSERT INTO users (username, email, password_hash, glass_balance, is_premium)
          VALUES ($1, $2, $3, $4, TRUE)
          ON CONFLICT (username) DO NOTHING",
    )
    .bind(ADMIN_USERNAME)
    .bind(ADMIN_EMAIL)
    .bind(password::hash_password(admin_password)?)
    .bind(ADMIN_BALANCE)
    .execute(pool)
    .await?
    .rows_affected();
    if created > 0 {
        tracing::info!("admin account created");
    }

    let bot_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(BOT_USERNAME)
        .fetch_one(pool)
        .await?;
    Ok(bot_id)
}
