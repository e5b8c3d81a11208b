use super::*;

fn form(username: &str, email: &str, password: &str, confirm: &str) -> Registration {
    Registration {
        username: username.into(),
        email: email.into(),
        password: password.into(),
        confirm_password: confirm.into(),
    }
}

// =============================================================================
// normalize_username
// =============================================================================

#[test]
fn normalize_username_trims() {
    assert_eq!(normalize_username("  alice "), Some("alice".to_owned()));
}

#[test]
fn normalize_username_accepts_admin_handle() {
    assert_eq!(normalize_username(ADMIN_USERNAME), Some("@".to_owned()));
}

#[test]
fn normalize_username_rejects_bad_shapes() {
    assert_eq!(normalize_username(""), None);
    assert_eq!(normalize_username("   "), None);
    assert_eq!(normalize_username("two words"), None);
    assert_eq!(normalize_username("tab\tname"), None);
    assert_eq!(normalize_username(&"x".repeat(65)), None);
}

#[test]
fn normalize_username_counts_chars_not_bytes() {
    let name = "я".repeat(64);
    assert_eq!(normalize_username(&name), Some(name.clone()));
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_lowercases() {
    assert_eq!(normalize_email("  USER@Example.com "), Some("user@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_invalid_values() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("user"), None);
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("user@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// validate_registration
// =============================================================================

#[test]
fn validate_registration_accepts_good_form() {
    let (username, email) = validate_registration(&form("bob", "Bob@Mail.com", "pw", "pw")).unwrap();
    assert_eq!(username, "bob");
    assert_eq!(email, "bob@mail.com");
}

#[test]
fn validate_registration_checks_password_match_first() {
    let err = validate_registration(&form("", "", "a", "b")).unwrap_err();
    assert!(matches!(err, AccountError::PasswordMismatch));
}

#[test]
fn validate_registration_rejects_empty_password() {
    let err = validate_registration(&form("bob", "bob@mail.com", "", "")).unwrap_err();
    assert!(matches!(err, AccountError::EmptyPassword));
}

#[test]
fn validate_registration_rejects_bad_username_and_email() {
    assert!(matches!(
        validate_registration(&form("b o b", "bob@mail.com", "pw", "pw")),
        Err(AccountError::InvalidUsername)
    ));
    assert!(matches!(
        validate_registration(&form("bob", "not-an-email", "pw", "pw")),
        Err(AccountError::InvalidEmail)
    ));
}

// =============================================================================
// escape_like
// =============================================================================

#[test]
fn escape_like_passes_plain_text() {
    assert_eq!(escape_like("alice"), "alice");
}

#[test]
fn escape_like_escapes_wildcards() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
}

// =============================================================================
// errors
// =============================================================================

#[test]
fn non_database_errors_pass_through_unique_mapping() {
    let err = map_unique_violation(sqlx::Error::RowNotFound);
    assert!(matches!(err, AccountError::Db(sqlx::Error::RowNotFound)));
}

#[test]
fn error_messages_are_human_readable() {
    assert_eq!(AccountError::InvalidCredentials.to_string(), "invalid username or password");
    assert_eq!(AccountError::NotFound("zed".into()).to_string(), "user not found: zed");
}

#[test]
fn user_summary_serializes_avatar_key() {
    let json = serde_json::to_value(UserSummary { id: 3, username: "carol".into(), avatar: "/a.png".into() }).unwrap();
    assert_eq!(json, serde_json::json!({"id": 3, "username": "carol", "avatar": "/a.png"}));
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
mod live {
    use super::*;
    use crate::services::message;
    use crate::state::test_helpers::{create_user, integration_pool, unique_name};

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn register_stores_user_and_sends_welcome() {
        let pool = integration_pool().await;
        let (bot_id, bot_name) = create_user(&pool, "bot", "pw").await;
        let username = unique_name("reg");
        let email = format!("{username}@Example.COM");

        let user_id = register(&pool, bot_id, &form(&format!("  {username} "), &email, "s3cret", "s3cret"))
            .await
            .expect("register should succeed");

        assert_eq!(find_id_by_username(&pool, &username).await.unwrap(), Some(user_id));
        assert_eq!(authenticate(&pool, &username, "s3cret").await.unwrap(), user_id);
        assert!(matches!(authenticate(&pool, &username, "nope").await, Err(AccountError::InvalidCredentials)));

        let inbox = message::inbox(&pool, user_id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].content, WELCOME_MESSAGE);
        assert_eq!(inbox[0].sender, bot_name);
        assert!(!inbox[0].is_own);

        let stored_email: String = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored_email, email.to_ascii_lowercase());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn register_rejects_taken_username_and_email() {
        let pool = integration_pool().await;
        let (bot_id, _) = create_user(&pool, "bot", "pw").await;
        let username = unique_name("dup");
        let email = format!("{username}@example.com");
        register(&pool, bot_id, &form(&username, &email, "pw", "pw")).await.unwrap();

        let again = register(&pool, bot_id, &form(&username, "other@example.com", "pw", "pw")).await;
        assert!(matches!(again, Err(AccountError::UsernameTaken)));

        let same_email = register(&pool, bot_id, &form(&unique_name("dup"), &email, "pw", "pw")).await;
        assert!(matches!(same_email, Err(AccountError::EmailTaken)));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL/live Postgres"]
    async fn search_treats_wildcards_literally() {
        let pool = integration_pool().await;
        let tag = unique_name("q");
        let (percent_id, percent_name) = create_user(&pool, &format!("{tag}%"), "pw").await;
        let (plain_id, plain_name) = create_user(&pool, &format!("{tag}a"), "pw").await;

        let hits = search_users(&pool, &format!("{tag}%"), &[]).await.unwrap();
        let names = hits.iter().map(|u| u.username.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec![percent_name.as_str()]);

        let underscore = search_users(&pool, &format!("{tag}_"), &[]).await.unwrap();
        assert!(underscore.is_empty());

        let upper = search_users(&pool, &tag.to_uppercase(), &[percent_id]).await.unwrap();
        let names = upper.iter().map(|u| u.username.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec![plain_name.as_str()]);
        assert_eq!(upper[0].id, plain_id);
    }
}
