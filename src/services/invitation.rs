//! Channel invitations.
//!
//! DESIGN
//! ======
//! Sending an invitation stores it as `pending` and has the bot drop an
//! `invitation` message (linked by `invitation_id`) into the invitee's
//! inbox. Responding flips the status exactly once and the bot confirms
//! the outcome to the responder. Both steps are single transactions.

use sqlx::{PgPool, Row};

use super::iso8601;
use super::message::{self, ContentType, MessagingError, NewMessage};

const MAX_CHANNEL_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A pending invitation as listed for the invitee.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PendingInvitation {
    pub id: i64,
    pub inviter: String,
    pub channel_name: String,
    pub created_at: String,
}

#[must_use]
pub fn normalize_channel_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_CHANNEL_NAME_LEN {
        return None;
    }
    Some(trimmed.to_owned())
}

#[must_use]
pub fn invitation_notice(inviter: &str, channel_name: &str) -> String {
    format!("🎉 {inviter} invites you to the channel \"{channel_name}\"")
}

#[must_use]
pub fn response_notice(accepted: bool, channel_name: &str) -> String {
    if accepted {
        format!("✅ You accepted the invitation to the channel \"{channel_name}\"")
    } else {
        format!("❌ You declined the invitation to the channel \"{channel_name}\"")
    }
}

/// Invite `invited_username` to `channel_name`. Returns the invitation id.
///
/// # Errors
///
/// Returns `InvalidChannelName`, `UserNotFound`, `SelfInvite`, or a database error.
pub async fn send(
    pool: &PgPool,
    bot_id: i64,
    inviter_id: i64,
    inviter_name: &str,
    invited_username: &str,
    channel_name: &str,
) -> Result<i64, MessagingError> {
    let channel_name = normalize_channel_name(channel_name).ok_or(MessagingError::InvalidChannelName)?;
    let invited_id = super::account::find_id_by_username(pool, invited_username.trim())
        .await?
        .ok_or(MessagingError::UserNotFound)?;
    if invited_id == inviter_id {
        return Err(MessagingError::SelfInvite);
    }

    let mut tx = pool.begin().await?;
    let invitation_id: i64 = sqlx::query_scalar(
        "INSERT INTO invitations (inviter_id, invited_user_id, channel_name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(inviter_id)
    .bind(invited_id)
    .bind(&channel_name)
    .fetch_one(tx.as_mut())
    .await?;

    let notice = invitation_notice(inviter_name, &channel_name);
    message::insert_message(
        tx.as_mut(),
        &NewMessage {
            sender_id: bot_id,
            receiver_id: Some(invited_id),
            content: &notice,
            content_type: ContentType::Invitation,
            invitation_id: Some(invitation_id),
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(invitation_id, inviter_id, invited_id, %channel_name, "invitation sent");
    Ok(invitation_id)
}

/// Accept or decline an invitation addressed to `user_id`. Returns the
/// confirmation text the bot sent.
///
/// # Errors
///
/// Returns `InvitationNotFound` if the invitation does not exist or is
/// addressed to someone else, `InvitationClosed` if it was already
/// answered, or a database error.
pub async fn respond(
    pool: &PgPool,
    bot_id: i64,
    user_id: i64,
    invitation_id: i64,
    accept: bool,
) -> Result<String, MessagingError> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT invited_user_id, channel_name, status FROM invitations WHERE id = $1 FOR UPDATE")
        .bind(invitation_id)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or(MessagingError::InvitationNotFound)?;

    let invited_user_id: i64 = row.get("invited_user_id");
    if invited_user_id != user_id {
        return Err(MessagingError::InvitationNotFound);
    }
    let status: String = row.get("status");
    if InvitationStatus::parse(&status) != Some(InvitationStatus::Pending) {
        return Err(MessagingError::InvitationClosed);
    }
    let channel_name: String = row.get("channel_name");

    let next = if accept { InvitationStatus::Accepted } else { InvitationStatus::Rejected };
    sqlx::query("UPDATE invitations SET status = $1 WHERE id = $2")
        .bind(next.as_str())
        .bind(invitation_id)
        .execute(tx.as_mut())
        .await?;

    let notice = response_notice(accept, &channel_name);
    message::insert_message(
        tx.as_mut(),
        &NewMessage {
            sender_id: bot_id,
            receiver_id: Some(user_id),
            content: &notice,
            content_type: ContentType::Text,
            invitation_id: None,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(invitation_id, user_id, status = next.as_str(), "invitation answered");
    Ok(notice)
}

/// Pending invitations addressed to `user_id`, oldest first.
pub async fn pending_for(pool: &PgPool, user_id: i64) -> Result<Vec<PendingInvitation>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT i.id, u.username AS inviter, i.channel_name, i.created_at
          FROM invitations i
          JOIN users u ON u.id = i.inviter_id
          WHERE i.invited_user_id = $1 AND i.status = 'pending'
          ORDER BY i.created_at, i.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|r| PendingInvitation {
            id: r.get("id"),
            inviter: r.get("inviter"),
            channel_name: r.get("channel_name"),
            created_at: iso8601(r.get("created_at")),
        })
        .collect())
}

#[cfg(test)]
#[path = "invitation_test.rs"]
mod tests;
