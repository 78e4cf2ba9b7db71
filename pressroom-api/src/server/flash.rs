//! Carries a [`Notification`] across a redirect in a short-lived cookie.
//!
//! The cookie is written when a write redirects to the post page and removed by the next
//! render of that page, so every notification is shown exactly once.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use pressroom_common::notification::Notification;
use tracing::debug;

pub const FLASH_COOKIE: &str = "flash";

#[must_use]
pub fn encode(notification: &Notification) -> Option<String> {
    let json = serde_json::to_vec(notification).ok()?;

    Some(BASE64_URL_SAFE_NO_PAD.encode(json))
}

#[must_use]
pub fn decode(value: &str) -> Option<Notification> {
    let json = BASE64_URL_SAFE_NO_PAD.decode(value).ok()?;

    serde_json::from_slice(&json).ok()
}

/// Leaves `notification` for the next page render.
#[must_use]
pub fn put(jar: CookieJar, notification: &Notification) -> CookieJar {
    let Some(value) = encode(notification) else {
        return jar;
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Removes the pending notification, if any, and returns it.
#[must_use]
pub fn take(jar: CookieJar) -> (CookieJar, Option<Notification>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let notification = decode(cookie.value());
    if notification.is_none() {
        debug!("Discarding unreadable flash cookie");
    }

    (
        jar.remove(Cookie::build(FLASH_COOKIE).path("/")),
        notification,
    )
}

#[cfg(test)]
mod tests {
    use crate::server::flash::{FLASH_COOKIE, decode, encode, put, take};
    use axum_extra::extract::cookie::{Cookie, CookieJar};
    use pressroom_common::notification::Notification;

    #[test]
    fn put_then_take() {
        let notification = Notification::error("You can only delete your own comments!");

        let jar = put(CookieJar::new(), &notification);
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_owned();
        assert_eq!(decode(&value), Some(notification.clone()));

        let incoming = CookieJar::new().add(Cookie::new(FLASH_COOKIE, value));
        let (jar, taken) = take(incoming);
        assert_eq!(taken, Some(notification));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn nothing_to_take() {
        let (_, taken) = take(CookieJar::new());
        assert_eq!(taken, None);
    }

    #[test]
    fn garbage_is_ignored() {
        let incoming = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "%%%"));
        let (jar, taken) = take(incoming);

        assert_eq!(taken, None);
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn encoded_value_is_cookie_safe() {
        let value = encode(&Notification::success("Comment deleted!")).unwrap();

        assert!(
            value
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_')
        );
    }
}
