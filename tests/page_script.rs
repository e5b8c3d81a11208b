//! Runs the page script against the settings page the server renders.

use std::sync::Arc;

use gslase::page::script::{self, LOAD_MESSAGE};
use gslase::page::{Document, MemorySink, PageHost};
use gslase::render;
use gslase::services::session::SessionUser;

fn settings_html() -> String {
    let user = SessionUser {
        id: 2,
        username: "alice".into(),
        email: "alice@example.com".into(),
        avatar_url: "/static/default-avatar.svg".into(),
        glass_balance: 100,
        is_premium: false,
    };
    render::settings_page(&user, None)
}

#[test]
fn settings_page_theme_select_is_observed() {
    let document = Document::parse(&settings_html());
    let theme = document.first_select().expect("settings page has a select");
    assert_eq!(document.control(theme).unwrap().value(), "dark");

    let sink = Arc::new(MemorySink::new());
    let mut host = PageHost::new(document, sink.clone());
    script::install(&mut host);
    host.fire_ready();

    assert!(host.select(theme, "light").unwrap());
    assert!(host.select(theme, "dark").unwrap());

    assert_eq!(
        sink.lines(),
        vec![
            LOAD_MESSAGE.to_owned(),
            "Theme changed to: light".to_owned(),
            "Theme changed to: dark".to_owned(),
        ]
    );
}

#[test]
fn main_page_without_select_only_announces_load() {
    let user = SessionUser {
        id: 2,
        username: "alice".into(),
        email: "alice@example.com".into(),
        avatar_url: "/static/default-avatar.svg".into(),
        glass_balance: 100,
        is_premium: false,
    };
    let document = Document::parse(&render::main_page(&user, false, &[], &[], None));
    assert!(document.first_select().is_none());

    let sink = Arc::new(MemorySink::new());
    let mut host = PageHost::new(document, sink.clone());
    script::install(&mut host);
    host.fire_ready();

    assert_eq!(sink.lines(), vec![LOAD_MESSAGE.to_owned()]);
}

#[test]
fn served_script_matches_native_messages() {
    let js = include_str!("../static/js/script.js");
    assert!(js.contains(LOAD_MESSAGE));
    assert!(js.contains("Theme changed to: "));
}
