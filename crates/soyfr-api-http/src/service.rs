//! Hyper `Service` implementation for the resource API.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use soyfr_api_model::ApiError;

use crate::body::ApiResponseBody;
use crate::context::build_context;
use crate::dispatch::Dispatcher;
use crate::registry::ResourceRegistry;
use crate::response::{error_to_response, to_http_response};

/// Configuration for the API HTTP service.
#[derive(Debug, Clone, Default)]
pub struct ApiHttpConfig {
    /// Path prefix every route starts with, e.g. `"v1"`. Empty by default.
    pub prefix: String,
}

impl ApiHttpConfig {
    /// Config with the given path prefix.
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

/// Hyper `Service` serving every resource in a registry.
#[derive(Debug, Clone)]
pub struct ApiHttpService {
    dispatcher: Arc<Dispatcher>,
}

impl ApiHttpService {
    /// Create a new `ApiHttpService` over a frozen registry.
    #[must_use]
    pub fn new(registry: Arc<ResourceRegistry>, config: ApiHttpConfig) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(registry, &config.prefix)),
        }
    }

    /// The dispatcher behind this service.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl<B> hyper::service::Service<http::Request<B>> for ApiHttpService
where
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    type Response = http::Response<ApiResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let dispatcher = Arc::clone(&self.dispatcher);
        let request_id = uuid::Uuid::new_v4().to_string();

        Box::pin(async move {
            let response = process_request(req, &dispatcher, &request_id).await;
            Ok(add_common_headers(response, &request_id))
        })
    }
}

/// Run one request through context building, routing and dispatch.
async fn process_request<B>(
    req: http::Request<B>,
    dispatcher: &Dispatcher,
    request_id: &str,
) -> http::Response<ApiResponseBody>
where
    B: http_body::Body,
    B::Error: std::fmt::Display,
{
    let (parts, incoming) = req.into_parts();

    let body = match collect_body(incoming).await {
        Ok(body) => body,
        Err(err) => return render_error(&err, request_id),
    };

    let ctx = build_context(&parts, body);
    let (kind, api_req) = match dispatcher.router().resolve(ctx) {
        Ok(resolved) => resolved,
        Err(err) => return render_error(&err, request_id),
    };

    match dispatcher
        .dispatch(kind, api_req)
        .await
        .and_then(|result| to_http_response(result, request_id))
    {
        Ok(response) => response,
        Err(err) => render_error(&err, request_id),
    }
}

/// Collect the incoming body into a single `Bytes` buffer.
async fn collect_body<B>(incoming: B) -> Result<Bytes, ApiError>
where
    B: http_body::Body,
    B::Error: std::fmt::Display,
{
    incoming
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| ApiError::internal_error(format!("Failed to read request body: {e}")))
}

fn render_error(err: &ApiError, request_id: &str) -> http::Response<ApiResponseBody> {
    if err.has_body() {
        tracing::debug!(status = %err.status_code, error = %err, "request failed");
    } else {
        tracing::error!(request_id, error = %err, source = ?err.source, "internal error");
    }
    error_to_response(err, request_id)
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ApiResponseBody>,
    request_id: &str,
) -> http::Response<ApiResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }

    headers.insert("server", http::HeaderValue::from_static("Soyfr"));

    // CORS headers.
    headers.insert(
        "access-control-allow-origin",
        http::HeaderValue::from_static("*"),
    );

    response
}

#[cfg(test)]
mod tests {
    use http_body_util::Full;
    use hyper::service::Service as _;
    use soyfr_api_model::{ApiRequest, Entity, Schema};

    use super::*;
    use crate::source::DataSource;

    struct NoPosts;

    #[async_trait::async_trait]
    impl DataSource for NoPosts {
        async fn find_all(&self, _req: &ApiRequest) -> Result<Vec<Entity>, ApiError> {
            Ok(Vec::new())
        }
        async fn find_one(&self, _id: &str, _req: &ApiRequest) -> Result<Entity, ApiError> {
            Err(ApiError::not_found("post not found"))
        }
        async fn find_multiple(
            &self,
            _ids: &[String],
            _req: &ApiRequest,
        ) -> Result<Vec<Entity>, ApiError> {
            Ok(Vec::new())
        }
        async fn create(&self, _entity: Entity) -> Result<String, ApiError> {
            Err(ApiError::internal_error("read only"))
        }
        async fn update(&self, _entity: Entity) -> Result<(), ApiError> {
            Err(ApiError::internal_error("read only"))
        }
        async fn delete(&self, _id: &str) -> Result<(), ApiError> {
            Err(ApiError::internal_error("read only"))
        }
    }

    fn service(prefix: &str) -> ApiHttpService {
        ApiHttpService::new(
            Arc::new(ResourceRegistry::default()),
            ApiHttpConfig::with_prefix(prefix),
        )
    }

    fn posts_service() -> ApiHttpService {
        let mut builder = ResourceRegistry::builder();
        builder
            .register(Schema::for_type("Post").scalar("title"), Arc::new(NoPosts))
            .unwrap();
        ApiHttpService::new(Arc::new(builder.build()), ApiHttpConfig::default())
    }

    fn request(method: http::Method, uri: &str) -> http::Request<Full<Bytes>> {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_should_add_common_headers() {
        let resp = service("")
            .call(request(http::Method::GET, "/posts"))
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(resp.headers().get("server").unwrap(), "Soyfr");
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert!(resp.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_should_not_found_outside_prefix() {
        let resp = service("v1")
            .call(request(http::Method::GET, "/v2/posts"))
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_should_reject_unsupported_method() {
        let resp = posts_service()
            .call(request(http::Method::PATCH, "/posts/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["errors"][0]["status"], "405");
    }

    #[tokio::test]
    async fn test_should_not_find_unknown_type_for_any_method() {
        for (method, uri) in [
            (http::Method::PATCH, "/unicorns"),
            (http::Method::PUT, "/unicorns/1,2"),
            (http::Method::DELETE, "/unicorns/1/horn"),
        ] {
            let resp = posts_service()
                .call(request(method.clone(), uri))
                .await
                .unwrap();
            assert_eq!(
                resp.status(),
                http::StatusCode::NOT_FOUND,
                "failed for {method} {uri}"
            );
        }
    }
}
