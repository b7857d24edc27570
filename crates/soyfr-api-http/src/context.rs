//! Request context builder.
//!
//! Turns the head and collected body of an HTTP request into a
//! [`RequestContext`]: method, percent-decoded path segments, query
//! parameters and body. Pure; no registry access happens here.

use bytes::Bytes;
use percent_encoding::percent_decode_str;
use soyfr_api_model::QueryParams;

/// Transport-independent view of one HTTP request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method.
    pub method: http::Method,
    /// Non-empty, percent-decoded path segments.
    pub segments: Vec<String>,
    /// Parsed query parameters.
    pub query: QueryParams,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Raw body bytes.
    pub body: Bytes,
}

/// Build a [`RequestContext`] from request parts and the collected body.
#[must_use]
pub fn build_context(parts: &http::request::Parts, body: Bytes) -> RequestContext {
    RequestContext {
        method: parts.method.clone(),
        segments: split_path(parts.uri.path()),
        query: QueryParams::parse(parts.uri.query().unwrap_or("")),
        headers: parts.headers.clone(),
        body,
    }
}

/// Split a URI path into decoded segments, dropping empty ones.
#[must_use]
pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(method: http::Method, uri: &str) -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn test_should_extract_method_segments_and_query() {
        let ctx = build_context(
            &parts(http::Method::GET, "/v1/posts/1,2?sort=title,date"),
            Bytes::new(),
        );
        assert_eq!(ctx.method, http::Method::GET);
        assert_eq!(ctx.segments, vec!["v1", "posts", "1,2"]);
        assert_eq!(
            ctx.query.get("sort"),
            Some(&["title".to_owned(), "date".to_owned()][..])
        );
    }

    #[test]
    fn test_should_keep_body_untouched() {
        let body = Bytes::from_static(br#"{"posts": [{"title": "New Post"}]}"#);
        let ctx = build_context(&parts(http::Method::POST, "/posts"), body.clone());
        assert_eq!(ctx.body, body);
        assert!(ctx.query.is_empty());
    }

    #[test]
    fn test_should_drop_empty_segments() {
        assert_eq!(split_path("//posts///1/"), vec!["posts", "1"]);
        assert!(split_path("/").is_empty());
    }

    #[test]
    fn test_should_percent_decode_segments() {
        assert_eq!(split_path("/users/a%20b"), vec!["users", "a b"]);
    }
}
