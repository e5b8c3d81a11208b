//! Chat service: one-to-one chat threads and their previews.

use sqlx::{PgPool, Row};

use super::iso8601;
use super::message::MessagingError;

pub const NO_MESSAGES: &str = "No messages";

/// A chat as listed for one participant.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChatSummary {
    pub chat_id: i64,
    pub other_user_id: i64,
    pub other_username: String,
    pub last_message: String,
    pub last_message_time: Option<String>,
}

/// Return the chat between `user_id` and `other_id`, creating it if needed.
///
/// # Errors
///
/// Returns `SelfChat` when both ids match, `UserNotFound` if `other_id`
/// does not exist, or a database error.
pub async fn create_or_get(pool: &PgPool, user_id: i64, other_id: i64) -> Result<i64, MessagingError> {
    if user_id == other_id {
        return Err(MessagingError::SelfChat);
    }
    if super::account::username_of(pool, other_id).await?.is_none() {
        return Err(MessagingError::UserNotFound);
    }

    let existing: Option<i64> = sqlx::query_scalar(
        r"SELECT id FROM chats
          WHERE (user1_id = $1 AND user2_id = $2) OR (user1_id = $2 AND user2_id = $1)
          ORDER BY id
          LIMIT 1",
    )
    .bind(user_id)
    .bind(other_id)
    .fetch_optional(pool)
    .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO chats (user1_id, user2_id) VALUES ($1, $2) RETURNING id")
        .bind(user_id)
        .bind(other_id)
        .fetch_one(pool)
        .await?;
    tracing::debug!(chat_id = id, user_id, other_id, "chat created");
    Ok(id)
}

/// Every chat the user takes part in, with the latest message between the pair.
pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<ChatSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT c.id AS chat_id, o.id AS other_user_id, o.username AS other_username,
                 lm.content AS last_content, lm.sent_at AS last_sent_at
          FROM chats c
          JOIN users o
            ON o.id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
          LEFT JOIN LATERAL (
              SELECT m.content, m.sent_at
              FROM messages m
              WHERE (m.sender_id = $1 AND m.receiver_id = o.id)
                 OR (m.sender_id = o.id AND m.receiver_id = $1)
              ORDER BY m.sent_at DESC, m.id DESC
              LIMIT 1
          ) lm ON TRUE
          WHERE c.user1_id = $1 OR c.user2_id = $1
          ORDER BY c.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| {
            let last_content: Option<String> = r.get("last_content");
            let last_sent_at: Option<time::OffsetDateTime> = r.get("last_sent_at");
            ChatSummary {
                chat_id: r.get("chat_id"),
                other_user_id: r.get("other_user_id"),
                other_username: r.get("other_username"),
                last_message: last_content.unwrap_or_else(|| NO_MESSAGES.to_owned()),
                last_message_time: last_sent_at.map(iso8601),
            }
        })
        .collect())
}
