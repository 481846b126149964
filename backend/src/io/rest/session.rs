//! Session cookie, flash messages and the authenticated-admin extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use tracing::debug;

use crate::domain::{AuthContext, PortalError};
use crate::io::rest::error::AppError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "constancia_session";
pub const FLASH_COOKIE: &str = "constancia_flash";

/// The logged-in admin, resolved from the session cookie on every request.
/// Requests without a live session are redirected to the login page.
pub struct Admin(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(PortalError::Unauthenticated)?;

        let context = state
            .admin_service
            .resolve_session(&token)
            .await?
            .ok_or(PortalError::Unauthenticated)?;

        debug!("Request by '{}'", context.username);
        Ok(Admin(context))
    }
}

pub fn session_cookie(token: String, secure: bool, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// One-shot message shown by the next dashboard view
pub fn flash_cookie(message: &str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(message)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Read the pending flash message and drop it from the jar
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| URL_SAFE_NO_PAD.decode(cookie.value()).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());

    if message.is_none() {
        return (jar, None);
    }
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/").build());
    (jar, message)
}
