//! One-shot flash notices carried in a cookie.
//!
//! The cookie stores a short code rather than text, so a client cannot make
//! the server render arbitrary strings. Reading a flash removes the cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Registered,
    AccessDenied,
    LoggedOut,
}

impl Flash {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::AccessDenied => "access_denied",
            Self::LoggedOut => "logged_out",
        }
    }

    #[must_use]
    pub fn from_code(raw: &str) -> Option<Self> {
        match raw {
            "registered" => Some(Self::Registered),
            "access_denied" => Some(Self::AccessDenied),
            "logged_out" => Some(Self::LoggedOut),
            _ => None,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Registered => "Registration successful! Welcome to GSLASE!",
            Self::AccessDenied => "Access denied",
            Self::LoggedOut => "You have been logged out",
        }
    }
}

#[must_use]
pub fn set(jar: CookieJar, flash: Flash, secure: bool) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.code()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure),
    )
}

/// Consume the pending flash, if any.
#[must_use]
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(flash) = jar.get(FLASH_COOKIE).map(|c| Flash::from_code(c.value())) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}
