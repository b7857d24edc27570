//! HTTP response body type.
//!
//! Every API response is either a fully rendered JSON document or nothing
//! (204s, `OPTIONS` and bare 500s), so the body is a single optional chunk
//! yielded as one data frame.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Frame, SizeHint};

/// Response body carrying at most one rendered JSON document.
#[derive(Debug, Default)]
pub struct ApiResponseBody {
    data: Option<Bytes>,
}

impl ApiResponseBody {
    /// Body holding a rendered JSON document. Empty input yields an empty body.
    #[must_use]
    pub fn json(data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            data: (!data.is_empty()).then_some(data),
        }
    }

    /// Body with no content.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

impl http_body::Body for ApiResponseBody {
    type Data = Bytes;
    type Error = Infallible;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(self.get_mut().data.take().map(|d| Ok(Frame::data(d))))
    }

    fn is_end_stream(&self) -> bool {
        self.data.is_none()
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.data.as_ref().map_or(0, |d| d.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use http_body::Body as _;
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_should_report_empty_body_as_ended() {
        let body = ApiResponseBody::empty();
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }

    #[test]
    fn test_should_treat_empty_json_as_empty_body() {
        let body = ApiResponseBody::json(Vec::new());
        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
    }

    #[tokio::test]
    async fn test_should_yield_document_as_single_frame() {
        let mut body = ApiResponseBody::json(br#"{"data":null}"#.to_vec());
        assert!(!body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(13));

        let frame = body.frame().await.unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from_static(br#"{"data":null}"#));
        assert!(body.is_end_stream());
        assert!(body.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_should_collect_json_document() {
        let body = ApiResponseBody::json(r#"{"status":"running"}"#);
        let bytes = body.collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"status":"running"}"#);
    }
}
