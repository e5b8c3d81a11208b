//! HTML page rendering.
//!
//! Pages are static templates with `{{PLACEHOLDER}}` slots filled by plain
//! string replacement. Every interpolated value goes through
//! [`escape_html`], which also escapes braces so user text can never form
//! a placeholder of its own.

use crate::services::account::UserListing;
use crate::services::invitation::PendingInvitation;
use crate::services::message::{ContentType, ConversationMessage};
use crate::services::session::SessionUser;

const LOGIN_TEMPLATE: &str = include_str!("../templates/login.html");
const REGISTER_TEMPLATE: &str = include_str!("../templates/register.html");
const MAIN_TEMPLATE: &str = include_str!("../templates/main.html");
const SETTINGS_TEMPLATE: &str = include_str!("../templates/settings.html");
const ADMIN_TEMPLATE: &str = include_str!("../templates/admin.html");

#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_block(flash: Option<&str>) -> String {
    flash.map_or_else(String::new, |msg| format!(r#"<p class="flash">{}</p>"#, escape_html(msg)))
}

/// Login form, or the registration form when `register` is set.
#[must_use]
pub fn login_page(register: bool, flash: Option<&str>) -> String {
    let template = if register { REGISTER_TEMPLATE } else { LOGIN_TEMPLATE };
    template.replace("{{FLASH}}", &flash_block(flash))
}

fn message_item(msg: &ConversationMessage) -> String {
    let mut classes = vec!["message"];
    if msg.is_own {
        classes.push("own");
    }
    if ContentType::parse(&msg.content_type) == Some(ContentType::Invitation) {
        classes.push("invitation");
    }
    format!(
        r#"<div class="{}"><strong>{}</strong> {}<time>{}</time></div>"#,
        classes.join(" "),
        escape_html(&msg.sender),
        escape_html(&msg.content),
        escape_html(&msg.timestamp),
    )
}

fn invitation_item(inv: &PendingInvitation) -> String {
    format!(
        r#"<div class="invitation" data-invitation-id="{}"><strong>{}</strong> invited you to <em>{}</em></div>"#,
        inv.id,
        escape_html(&inv.inviter),
        escape_html(&inv.channel_name),
    )
}

fn list_or_empty<T>(items: &[T], empty: &str, render: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return format!(r#"<p class="empty">{empty}</p>"#);
    }
    items.iter().map(render).collect::<Vec<_>>().join("\n")
}

#[must_use]
pub fn main_page(
    user: &SessionUser,
    is_admin: bool,
    messages: &[ConversationMessage],
    invitations: &[PendingInvitation],
    flash: Option<&str>,
) -> String {
    let admin_link = if is_admin { r#" <a href="/admin">Admin</a>"# } else { "" };
    MAIN_TEMPLATE
        .replace("{{USERNAME}}", &escape_html(&user.username))
        .replace("{{BALANCE}}", &user.glass_balance.to_string())
        .replace("{{ADMIN_LINK}}", admin_link)
        .replace("{{FLASH}}", &flash_block(flash))
        .replace("{{INVITATIONS}}", &list_or_empty(invitations, "No pending invitations", invitation_item))
        .replace("{{MESSAGES}}", &list_or_empty(messages, "No messages yet", message_item))
}

/// The settings markup before any user data is filled in.
#[must_use]
pub fn settings_template() -> &'static str {
    SETTINGS_TEMPLATE
}

#[must_use]
pub fn settings_page(user: &SessionUser, flash: Option<&str>) -> String {
    SETTINGS_TEMPLATE
        .replace("{{USERNAME}}", &escape_html(&user.username))
        .replace("{{FLASH}}", &flash_block(flash))
}

fn user_row(u: &UserListing) -> String {
    format!(
        "        <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        u.id,
        escape_html(&u.username),
        escape_html(&u.email),
        u.glass_balance,
        if u.is_premium { "yes" } else { "no" },
        if u.is_banned { "yes" } else { "no" },
    )
}

#[must_use]
pub fn admin_page(user: &SessionUser, users: &[UserListing]) -> String {
    let rows = users.iter().map(user_row).collect::<Vec<_>>().join("\n");
    ADMIN_TEMPLATE
        .replace("{{USERNAME}}", &escape_html(&user.username))
        .replace("{{USERS}}", &rows)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
