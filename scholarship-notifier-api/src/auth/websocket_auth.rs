use crate::error::Error;
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap,
};

const ACCESS_TOKEN_COOKIE: &str = "access_token";

///
/// Resolves JWT for a WebSocket handshake.
///
/// Browsers cannot set headers on WebSocket requests so the token
/// is looked up in multiple places. Sources are checked in order:
/// 1. `token` query parameter
/// 2. Authorization header with Bearer scheme
/// 3. `access_token` cookie
///
/// ### Errors
/// - [Error::TokenMissing] when no source contains a token
///
pub fn resolve_websocket_token(
    query_token: Option<&str>,
    headers: &HeaderMap,
) -> Result<String, Error> {
    if let Some(token) = query_token {
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Some(token) = bearer_token(headers) {
        return Ok(token);
    }

    if let Some(token) = cookie_token(headers) {
        return Ok(token);
    }

    Err(Error::TokenMissing)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let authorization = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = authorization.strip_prefix("Bearer ")?;

    match token.is_empty() {
        true => None,
        false => Some(token.to_string()),
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;

    cookies
        .split(';')
        .map(|cookie| cookie.trim())
        .find_map(|cookie| {
            let (name, value) = cookie.split_once('=')?;
            match name == ACCESS_TOKEN_COOKIE && !value.is_empty() {
                true => Some(value.to_string()),
                false => None,
            }
        })
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_from_query() {
        let headers = HeaderMap::new();

        let token = resolve_websocket_token(Some("query jwt"), &headers).unwrap();

        assert_eq!(token, "query jwt");
    }

    #[test]
    fn token_from_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header jwt"));

        let token = resolve_websocket_token(None, &headers).unwrap();

        assert_eq!(token, "header jwt");
    }

    #[test]
    fn token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; access_token=cookie_jwt; lang=en"),
        );

        let token = resolve_websocket_token(None, &headers).unwrap();

        assert_eq!(token, "cookie_jwt");
    }

    #[test]
    fn query_takes_precedence_over_header_and_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header jwt"));
        headers.insert(COOKIE, HeaderValue::from_static("access_token=cookie_jwt"));

        let token = resolve_websocket_token(Some("query jwt"), &headers).unwrap();

        assert_eq!(token, "query jwt");
    }

    #[test]
    fn header_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header jwt"));
        headers.insert(COOKIE, HeaderValue::from_static("access_token=cookie_jwt"));

        let token = resolve_websocket_token(None, &headers).unwrap();

        assert_eq!(token, "header jwt");
    }

    #[test]
    fn empty_query_token_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header jwt"));

        let token = resolve_websocket_token(Some(""), &headers).unwrap();

        assert_eq!(token, "header jwt");
    }

    #[test]
    fn authorization_type_not_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic credentials"));

        let result = resolve_websocket_token(None, &headers);

        assert!(matches!(result, Err(Error::TokenMissing)));
    }

    #[test]
    fn no_token_in_any_source() {
        let headers = HeaderMap::new();

        let result = resolve_websocket_token(None, &headers);

        assert!(matches!(result, Err(Error::TokenMissing)));
    }
}
