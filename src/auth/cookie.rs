use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE: &str = "jwt";

/// Build the session cookie carrying a freshly issued token.
///
/// `SameSite=None` is required for the cookie to be sent from a separately
/// hosted frontend; browsers only accept that combination together with
/// `Secure`, so both attributes are driven by the one production flag.
pub fn session_cookie(
    token: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=None; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Overwrite the session cookie with an empty, immediately expiring value.
pub fn clear_session_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    session_cookie("", 0, secure)
}

/// Pull the session token out of the request `Cookie` header, if present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE && !val.is_empty() {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_sets_expected_attributes() {
        let cookie = session_cookie("tok123", 86_400, false).expect("valid header");
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("jwt=tok123;"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=None"));
        assert!(value.contains("Max-Age=86400"));
        assert!(!value.contains("Secure"));
    }

    #[test]
    fn secure_is_appended_in_production() {
        let cookie = session_cookie("tok123", 86_400, true).expect("valid header");
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_has_zero_lifetime_and_empty_value() {
        let cookie = clear_session_cookie(true).expect("valid header");
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("jwt=;"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn extract_finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; jwt=abc.def.ghi; lang=en"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn extract_ignores_cleared_or_missing_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("jwt="));
        assert_eq!(extract_session_token(&headers), None);
    }
}
