use super::*;

fn user(username: &str) -> SessionUser {
    SessionUser {
        id: 3,
        username: username.into(),
        email: "u@example.com".into(),
        avatar_url: "/static/default-avatar.svg".into(),
        glass_balance: 150,
        is_premium: false,
    }
}

fn message(content: &str, content_type: &str, is_own: bool) -> ConversationMessage {
    ConversationMessage {
        id: 1,
        content: content.into(),
        sender: "alice".into(),
        timestamp: "2024-01-01T00:00:00Z".into(),
        is_own,
        content_type: content_type.into(),
        invitation_id: None,
    }
}

fn assert_no_placeholders(html: &str) {
    assert!(!html.contains("{{"), "unfilled placeholder in:\n{html}");
}

// =============================================================================
// escape_html
// =============================================================================

#[test]
fn escape_html_escapes_markup() {
    assert_eq!(
        escape_html(r#"<script>alert("x") & 'y'</script>"#),
        "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
    );
}

#[test]
fn escape_html_escapes_braces() {
    assert_eq!(escape_html("{{MESSAGES}}"), "&#123;&#123;MESSAGES&#125;&#125;");
}

#[test]
fn escape_html_keeps_unicode() {
    assert_eq!(escape_html("Привет 🎉"), "Привет 🎉");
}

// =============================================================================
// pages
// =============================================================================

#[test]
fn login_page_variants() {
    let login = login_page(false, None);
    assert!(login.contains(r#"action="/login""#));
    assert!(!login.contains("flash"));
    assert_no_placeholders(&login);

    let register = login_page(true, Some("Passwords do not match"));
    assert!(register.contains(r#"action="/register""#));
    assert!(register.contains("confirm_password"));
    assert!(register.contains(r#"<p class="flash">Passwords do not match</p>"#));
    assert_no_placeholders(&register);
}

#[test]
fn main_page_renders_messages_and_invitations() {
    let messages = vec![message("hi <b>", "text", false), message("join us", "invitation", true)];
    let invitations = vec![PendingInvitation {
        id: 12,
        inviter: "bob".into(),
        channel_name: "rust & co".into(),
        created_at: "2024-01-01T00:00:00Z".into(),
    }];
    let html = main_page(&user("carol"), false, &messages, &invitations, Some("Welcome!"));

    assert!(html.contains("carol · 150 glass"));
    assert!(html.contains("hi &lt;b&gt;"));
    assert!(html.contains(r#"class="message own invitation""#));
    assert!(html.contains(r#"data-invitation-id="12""#));
    assert!(html.contains("rust &amp; co"));
    assert!(html.contains("Welcome!"));
    assert!(!html.contains(r#"href="/admin""#));
    assert_no_placeholders(&html);
}

#[test]
fn main_page_empty_states_and_admin_link() {
    let html = main_page(&user("@"), true, &[], &[], None);
    assert!(html.contains("No messages yet"));
    assert!(html.contains("No pending invitations"));
    assert!(html.contains(r#"href="/admin""#));
    assert_no_placeholders(&html);
}

#[test]
fn user_text_cannot_inject_placeholders() {
    let messages = vec![message("{{INVITATIONS}}", "text", false)];
    let html = main_page(&user("x"), false, &messages, &[], None);
    assert!(html.contains("No pending invitations"));
    assert_eq!(html.matches("No pending invitations").count(), 1);
}

#[test]
fn settings_page_has_theme_select() {
    let html = settings_page(&user("dave"), None);
    assert!(html.contains(r#"<select id="theme" name="theme">"#));
    assert!(html.contains(r#"<option value="dark">Dark</option>"#));
    assert!(html.contains(r#"<option value="light">Light</option>"#));
    assert!(html.contains("/static/js/script.js"));
    assert_no_placeholders(&html);
}

#[test]
fn admin_page_lists_users() {
    let users = vec![
        UserListing {
            id: 1,
            username: "GSLASE_Bot".into(),
            email: "bot@gslase.com".into(),
            glass_balance: 0,
            is_premium: false,
            is_banned: false,
        },
        UserListing {
            id: 4,
            username: "<evil>".into(),
            email: "e@x.com".into(),
            glass_balance: 100,
            is_premium: false,
            is_banned: true,
        },
    ];
    let html = admin_page(&user("@"), &users);
    assert!(html.contains("<td>GSLASE_Bot</td>"));
    assert!(html.contains("<td>&lt;evil&gt;</td>"));
    assert!(html.contains("<td>yes</td>"));
    assert_no_placeholders(&html);
}
