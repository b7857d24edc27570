//! Gateway service in front of the resource API.
//!
//! Health-check endpoints (`/_health`, `/health`) are answered here; every
//! other request goes to the [`ApiHttpService`].

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use hyper::service::Service;
use soyfr_api_http::{ApiHttpService, ApiResponseBody};

use crate::VERSION;

/// Top-level service handed to each connection.
#[derive(Debug, Clone)]
pub struct GatewayService {
    api: ApiHttpService,
}

impl GatewayService {
    /// Create a new gateway wrapping the resource API.
    pub fn new(api: ApiHttpService) -> Self {
        Self { api }
    }
}

impl<B> Service<http::Request<B>> for GatewayService
where
    B: http_body::Body + Send + 'static,
    B::Data: Send,
    B::Error: std::fmt::Display,
{
    type Response = http::Response<ApiResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        if is_health_check(req.method(), req.uri().path()) {
            return Box::pin(async { Ok(health_check_response()) });
        }
        self.api.call(req)
    }
}

/// Check if the request targets a health endpoint.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn health_check_response() -> http::Response<ApiResponseBody> {
    let body = serde_json::json!({"status": "running", "version": VERSION});
    let mut response = http::Response::new(ApiResponseBody::json(body.to_string()));
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}
