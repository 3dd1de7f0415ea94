//! Request helpers used by generated clients.
//!
//! Generated methods build a [`reqwest::blocking::Request`] and then adjust
//! its headers with these functions before handing it to [`execute`].

use reqwest::blocking::{Client, Request, Response};
use reqwest::header::{COOKIE, CONTENT_TYPE, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::ClientError;

/// Joins a base URL and a request URI with exactly one `/` between them.
///
/// Trailing slashes of `base` and leading slashes of `uri` are dropped.
///
/// ## Examples
///
/// ```
/// assert_eq!(
///     courier::request::join_url("https://api.test/v1/", "/items/3"),
///     "https://api.test/v1/items/3"
/// );
/// ```
pub fn join_url(base: &str, uri: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        uri.trim_start_matches('/')
    )
}

fn header_name(name: &str) -> Result<HeaderName, ClientError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Appends a header value, keeping any values already present.
pub fn add_header(request: &mut Request, name: &str, value: &str) -> Result<(), ClientError> {
    let key = header_name(name)?;
    let value = header_value(name, value)?;
    request.headers_mut().append(key, value);
    Ok(())
}

/// Sets a header, replacing every value already present under that name.
pub fn set_header(request: &mut Request, name: &str, value: &str) -> Result<(), ClientError> {
    let key = header_name(name)?;
    let value = header_value(name, value)?;
    request.headers_mut().insert(key, value);
    Ok(())
}

/// Adds a `name=value` pair to the request's `Cookie` header.
///
/// Pairs accumulate in call order inside a single header, separated by `; `.
pub fn add_cookie(request: &mut Request, name: &str, value: &str) -> Result<(), ClientError> {
    let pair = format!("{name}={value}");
    let merged = match request.headers().get(COOKIE) {
        Some(existing) => {
            let existing = existing.to_str().map_err(|e| ClientError::InvalidHeader {
                name: COOKIE.to_string(),
                reason: e.to_string(),
            })?;
            format!("{existing}; {pair}")
        }
        None => pair,
    };
    let value = header_value(name, &merged)?;
    request.headers_mut().insert(COOKIE, value);
    Ok(())
}

/// Sets the `Content-Type` header.
pub fn set_content_type(request: &mut Request, content_type: &str) -> Result<(), ClientError> {
    let value = header_value(CONTENT_TYPE.as_str(), content_type)?;
    request.headers_mut().insert(CONTENT_TYPE, value);
    Ok(())
}

/// Returns the `Content-Type` of a multipart form, including its boundary.
pub fn multipart_content_type(form: &reqwest::blocking::multipart::Form) -> String {
    format!("multipart/form-data; boundary={}", form.boundary())
}

/// Sends a request. Transport failures are returned as-is, never retried.
pub fn execute(client: &Client, request: Request) -> Result<Response, ClientError> {
    debug!(method = %request.method(), url = %request.url(), "sending request");
    let response = client.execute(request)?;
    debug!(status = response.status().as_u16(), "received response");
    Ok(response)
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn request() -> Request {
        Client::new()
            .get("http://localhost/items")
            .build()
            .unwrap()
    }

    #[test]
    fn join_url_collapses_slashes() {
        assert_eq!(join_url("http://a.test/", "/b"), "http://a.test/b");
        assert_eq!(join_url("http://a.test///", "b/c"), "http://a.test/b/c");
        assert_eq!(join_url("http://a.test", "/"), "http://a.test/");
        assert_eq!(join_url("http://a.test/v1", ""), "http://a.test/v1/");
    }

    #[test]
    fn add_header_appends() {
        let mut req = request();
        add_header(&mut req, "X-Tag", "a").unwrap();
        add_header(&mut req, "X-Tag", "b").unwrap();
        let values: Vec<_> = req.headers().get_all("x-tag").iter().collect();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn set_header_overwrites_defaults() {
        let mut req = request();
        add_header(&mut req, "Accept", "text/plain").unwrap();
        add_header(&mut req, "Accept", "text/html").unwrap();
        set_header(&mut req, "Accept", "application/json").unwrap();
        let values: Vec<_> = req.headers().get_all("accept").iter().collect();
        assert_eq!(values, vec!["application/json"]);
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let mut req = request();
        let err = add_header(&mut req, "bad name", "x").unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { ref name, .. } if name == "bad name"));
    }

    #[test]
    fn invalid_header_value_is_rejected() {
        let mut req = request();
        let err = set_header(&mut req, "X-Line", "a\nb").unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }

    #[test]
    fn cookies_merge_into_one_header() {
        let mut req = request();
        add_cookie(&mut req, "session", "abc").unwrap();
        add_cookie(&mut req, "theme", "dark").unwrap();
        assert_eq!(
            req.headers().get(COOKIE).unwrap(),
            "session=abc; theme=dark"
        );
    }

    #[test]
    fn content_type_is_replaced() {
        let mut req = request();
        set_content_type(&mut req, "text/plain").unwrap();
        set_content_type(&mut req, "application/json; charset=UTF-8").unwrap();
        assert_eq!(
            req.headers().get(CONTENT_TYPE).unwrap(),
            "application/json; charset=UTF-8"
        );
    }

    #[test]
    fn multipart_content_type_carries_boundary() {
        let form = reqwest::blocking::multipart::Form::new().text("a", "b");
        let ct = multipart_content_type(&form);
        assert!(ct.starts_with("multipart/form-data; boundary="));
        assert!(ct.ends_with(form.boundary()));
    }

    #[test]
    #[traced_test]
    fn execute_reports_transport_failure() {
        let client = Client::new();
        let req = client.get("http://127.0.0.1:1/unreachable").build().unwrap();
        let err = execute(&client, req).unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert!(logs_contain("sending request"));
        assert!(!logs_contain("received response"));
    }
}
