//! Cookie utilities for the identity and flash cookies
//!
//! Centralizes cookie names and Set-Cookie formatting so handlers and the
//! renderer agree on them.

use axum::http::{HeaderValue, StatusCode};
use axum_extra::extract::CookieJar;
use percent_encoding::{NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::views::{Flash, FlashKind};

/// Cookie configuration constants
pub mod config {
    /// Access token cookie name (signed identity, issued elsewhere)
    pub const ACCESS_TOKEN_NAME: &str = "access_token";
    /// Flash cookie name
    pub const FLASH_NAME: &str = "flash";
    /// Path for the flash cookie (all routes)
    pub const FLASH_COOKIE_PATH: &str = "/";
}

fn is_dev() -> bool {
    std::env::var("ENV").as_deref() != Ok("prod")
}

/// Cookie value for a flash: `<kind>.<percent-encoded message>`
pub fn encode_flash(flash: &Flash) -> String {
    format!(
        "{}.{}",
        flash.kind.as_str(),
        utf8_percent_encode(&flash.message, NON_ALPHANUMERIC)
    )
}

pub fn decode_flash(value: &str) -> Option<Flash> {
    let (kind, message) = value.split_once('.')?;
    let kind = FlashKind::parse(kind)?;
    let message = percent_decode_str(message).decode_utf8().ok()?;
    Some(Flash {
        kind,
        message: message.into_owned(),
    })
}

/// Pending flash from the request cookies, if any
pub fn read_flash(jar: &CookieJar) -> Option<Flash> {
    jar.get(config::FLASH_NAME)
        .and_then(|cookie| decode_flash(cookie.value()))
}

/// Build a flash Set-Cookie header value
pub fn build_flash_cookie(flash: &Flash) -> Result<HeaderValue, StatusCode> {
    let secure = if is_dev() { "" } else { " Secure;" };
    let cookie = format!(
        "{}={}; HttpOnly;{} SameSite=Lax; Path={}",
        config::FLASH_NAME,
        encode_flash(flash),
        secure,
        config::FLASH_COOKIE_PATH,
    );
    cookie.parse().map_err(|_| {
        tracing::error!("Failed to parse flash cookie header");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Build a Set-Cookie header to clear the flash
pub fn build_clear_flash_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
