//! Message service: direct messages between users and bot notices.
//!
//! DESIGN
//! ======
//! A message has a sender and (normally) a receiver. The conversation
//! between two users is every message sent in either direction, oldest
//! first. System notices are ordinary messages whose sender is the bot.

use sqlx::{PgPool, Row};
use time::OffsetDateTime;

use super::iso8601;

pub const UNKNOWN_SENDER: &str = "Unknown";

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("user not found")]
    UserNotFound,
    #[error("cannot start a chat with yourself")]
    SelfChat,
    #[error("cannot invite yourself")]
    SelfInvite,
    #[error("invalid channel name")]
    InvalidChannelName,
    #[error("invitation not found")]
    InvitationNotFound,
    #[error("invitation was already answered")]
    InvitationClosed,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Invitation,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Invitation => "invitation",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(Self::Text),
            "invitation" => Some(Self::Invitation),
            _ => None,
        }
    }
}

pub struct NewMessage<'a> {
    pub sender_id: i64,
    pub receiver_id: Option<i64>,
    pub content: &'a str,
    pub content_type: ContentType,
    pub invitation_id: Option<i64>,
}

/// A freshly sent message, as echoed back to the sender.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SentMessage {
    pub id: i64,
    pub content: String,
    pub sender: String,
    pub timestamp: String,
}

/// One message as seen by a participant of the conversation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversationMessage {
    pub id: i64,
    pub content: String,
    pub sender: String,
    pub timestamp: String,
    pub is_own: bool,
    pub content_type: String,
    pub invitation_id: Option<i64>,
}

/// Trim message content, rejecting blank messages.
#[must_use]
pub fn normalize_content(content: &str) -> Option<&str> {
    let trimmed = content.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Insert a message on any executor (pool or open transaction).
/// Returns the new id and its timestamp.
pub async fn insert_message<'e, E>(executor: E, msg: &NewMessage<'_>) -> Result<(i64, OffsetDateTime), sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query(
        r"INSERT INTO messages (sender_id, receiver_id, content, content_type, invitation_id)
          VALUES ($1, $2, $3, $4, $5)
          RETURNING id, sent_at",
    )
    .bind(msg.sender_id)
    .bind(msg.receiver_id)
    .bind(msg.content)
    .bind(msg.content_type.as_str())
    .bind(msg.invitation_id)
    .fetch_one(executor)
    .await?;
    Ok((row.get("id"), row.get("sent_at")))
}

/// Send a text message from `sender` to `receiver_id`.
///
/// # Errors
///
/// Returns `EmptyMessage` for blank content, `UserNotFound` if the receiver
/// does not exist, or a database error.
pub async fn send(
    pool: &PgPool,
    sender_id: i64,
    sender_name: &str,
    receiver_id: i64,
    content: &str,
) -> Result<SentMessage, MessagingError> {
    let content = normalize_content(content).ok_or(MessagingError::EmptyMessage)?;
    if super::account::username_of(pool, receiver_id).await?.is_none() {
        return Err(MessagingError::UserNotFound);
    }

    let (id, sent_at) = insert_message(
        pool,
        &NewMessage {
            sender_id,
            receiver_id: Some(receiver_id),
            content,
            content_type: ContentType::Text,
            invitation_id: None,
        },
    )
    .await?;

    Ok(SentMessage { id, content: content.to_owned(), sender: sender_name.to_owned(), timestamp: iso8601(sent_at) })
}

fn to_conversation_message(row: &sqlx::postgres::PgRow, viewer_id: i64) -> ConversationMessage {
    let sender_id: i64 = row.get("sender_id");
    let sender: Option<String> = row.get("sender");
    ConversationMessage {
        id: row.get("id"),
        content: row.get("content"),
        sender: sender.unwrap_or_else(|| UNKNOWN_SENDER.to_owned()),
        timestamp: iso8601(row.get("sent_at")),
        is_own: sender_id == viewer_id,
        content_type: row.get("content_type"),
        invitation_id: row.get("invitation_id"),
    }
}

/// Messages exchanged between `viewer_id` and `other_id`, oldest first.
pub async fn conversation(pool: &PgPool, viewer_id: i64, other_id: i64) -> Result<Vec<ConversationMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT m.id, m.sender_id, u.username AS sender, m.content, m.content_type,
                 m.invitation_id, m.sent_at
          FROM messages m
          LEFT JOIN users u ON u.id = m.sender_id
          WHERE (m.sender_id = $1 AND m.receiver_id = $2)
             OR (m.sender_id = $2 AND m.receiver_id = $1)
          ORDER BY m.sent_at ASC, m.id ASC",
    )
    .bind(viewer_id)
    .bind(other_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|r| to_conversation_message(r, viewer_id)).collect())
}

/// Every message the user sent or received, oldest first.
pub async fn inbox(pool: &PgPool, user_id: i64) -> Result<Vec<ConversationMessage>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT m.id, m.sender_id, u.username AS sender, m.content, m.content_type,
                 m.invitation_id, m.sent_at
          FROM messages m
          LEFT JOIN users u ON u.id = m.sender_id
          WHERE m.sender_id = $1 OR m.receiver_id = $1
          ORDER BY m.sent_at ASC, m.id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|r| to_conversation_message(r, user_id)).collect())
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
