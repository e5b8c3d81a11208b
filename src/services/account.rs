//! Account service: registration, login, lookup, and search.

use sqlx::{PgPool, Row};

use super::message::{self, ContentType, NewMessage};
use super::password;

pub const BOT_USERNAME: &str = "GSLASE_Bot";
pub const ADMIN_USERNAME: &str = "@";
pub const WELCOME_MESSAGE: &str = "Welcome to GSLASE! Here you can chat with other users.";

const MAX_USERNAME_LEN: usize = 64;
const MAX_EMAIL_LEN: usize = 120;
pub const SEARCH_LIMIT: i64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid username")]
    InvalidUsername,
    #[error("invalid email")]
    InvalidEmail,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("email is already in use")]
    EmailTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account is banned")]
    Banned,
    #[error("user not found: {0}")]
    NotFound(String),
    #[error("invalid amount")]
    InvalidAmount,
    #[error("password hashing failed: {0}")]
    Hash(#[from] password::HashError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Registration form as submitted by the browser.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Row shown in user search results.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub avatar: String,
}

/// Row shown in the admin user list.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub glass_balance: i64,
    pub is_premium: bool,
    pub is_banned: bool,
}

// =============================================================================
// VALIDATION
// =============================================================================

#[must_use]
pub fn normalize_username(username: &str) -> Option<String> {
    let trimmed = username.trim();
    if trimmed.is_empty()
        || trimmed.chars().count() > MAX_USERNAME_LEN
        || trimmed.chars().any(|c| c.is_whitespace() || c.is_control())
    {
        return None;
    }
    Some(trimmed.to_owned())
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || normalized.len() > MAX_EMAIL_LEN {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Validate a registration form, returning normalized `(username, email)`.
///
/// # Errors
///
/// Returns the first validation failure found.
pub fn validate_registration(form: &Registration) -> Result<(String, String), AccountError> {
    if form.password != form.confirm_password {
        return Err(AccountError::PasswordMismatch);
    }
    if form.password.is_empty() {
        return Err(AccountError::EmptyPassword);
    }
    let username = normalize_username(&form.username).ok_or(AccountError::InvalidUsername)?;
    let email = normalize_email(&form.email).ok_or(AccountError::InvalidEmail)?;
    Ok((username, email))
}

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE`.
#[must_use]
pub fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn map_unique_violation(err: sqlx::Error) -> AccountError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some(c) if c.contains("email") => AccountError::EmailTaken,
                _ => AccountError::UsernameTaken,
            };
        }
    }
    AccountError::Db(err)
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Create an account and send it the bot's welcome message. Returns the new user id.
///
/// # Errors
///
/// Returns validation errors, `UsernameTaken`/`EmailTaken` on conflicts,
/// or a database error.
pub async fn register(pool: &PgPool, bot_id: i64, form: &Registration) -> Result<i64, AccountError> {
    let (username, email) = validate_registration(form)?;

    if find_id_by_username(pool, &username).await?.is_some() {
        return Err(AccountError::UsernameTaken);
    }
    let email_in_use: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(&email)
        .fetch_one(pool)
        .await?;
    if email_in_use {
        return Err(AccountError::EmailTaken);
    }

    let password_hash = password::hash_password(&form.password)?;

    let mut tx = pool.begin().await?;
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(tx.as_mut())
    .await
    .map_err(map_unique_violation)?;

    message::insert_message(
        tx.as_mut(),
        &NewMessage {
            sender_id: bot_id,
            receiver_id: Some(user_id),
            content: WELCOME_MESSAGE,
            content_type: ContentType::Text,
            invitation_id: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id, %username, "account registered");
    Ok(user_id)
}

/// Verify credentials, returning the user id.
///
/// # Errors
///
/// Returns `InvalidCredentials` for unknown users or wrong passwords,
/// `Banned` for banned accounts, or a database error.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<i64, AccountError> {
    let row = sqlx::query("SELECT id, password_hash, is_banned FROM users WHERE username = $1")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?
        .ok_or(AccountError::InvalidCredentials)?;

    let stored: Option<String> = row.get("password_hash");
    let matches = stored.is_some_and(|hash| password::verify_password(password, &hash));
    if !matches {
        return Err(AccountError::InvalidCredentials);
    }
    if row.get::<bool, _>("is_banned") {
        return Err(AccountError::Banned);
    }
    Ok(row.get("id"))
}

/// Look up a user id by exact username.
pub async fn find_id_by_username(pool: &PgPool, username: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Username for a user id, if the user exists.
pub async fn username_of(pool: &PgPool, user_id: i64) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT username FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive substring search on usernames, skipping `exclude` ids.
pub async fn search_users(pool: &PgPool, query: &str, exclude: &[i64]) -> Result<Vec<UserSummary>, sqlx::Error> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", escape_like(query));
    let rows = sqlx::query_as::<_, (i64, String, String)>(
        r"SELECT id, username, avatar_url
          FROM users
          WHERE username ILIKE $1 ESCAPE '\' AND NOT (id = ANY($2))
          ORDER BY username
          LIMIT $3",
    )
    .bind(&pattern)
    .bind(exclude)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, username, avatar)| UserSummary { id, username, avatar })
        .collect())
}

/// Every account, oldest first, for the admin panel.
pub async fn list_users(pool: &PgPool) -> Result<Vec<UserListing>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64, bool, bool)>(
        "SELECT id, username, email, glass_balance, is_premium, is_banned FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, username, email, glass_balance, is_premium, is_banned)| UserListing {
            id,
            username,
            email,
            glass_balance,
            is_premium,
            is_banned,
        })
        .collect())
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
