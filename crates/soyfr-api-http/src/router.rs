//! Request routing: path shape and method to operation.
//!
//! Paths have the shape
//!
//! ```text
//! /{prefix}/{type}[/{id}|/{id1},{id2},...[/{relation}]]
//! ```
//!
//! [`Router::resolve`] only classifies the path. The dispatcher checks that
//! `{type}` is registered before [`Route::identify`] maps the method, so an
//! unknown type is a 404 whatever the method.

use soyfr_api_model::{ApiError, ApiOperation, ApiRequest, RouteKind};

use crate::context::{RequestContext, split_path};

/// A classified request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Path shape.
    pub kind: RouteKind,
    /// Operation to perform.
    pub operation: ApiOperation,
}

impl Route {
    /// Map the request method on a path shape to an operation.
    ///
    /// # Errors
    ///
    /// - `InternalServerError` for writes addressed to an id list.
    /// - 405 for methods the route shape does not support.
    pub fn identify(kind: RouteKind, req: &ApiRequest) -> Result<Self, ApiError> {
        let operation = identify_operation(&req.method, kind, req.ids.len())?;
        Ok(Self { kind, operation })
    }
}

/// Path prefix aware request router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    prefix: Vec<String>,
}

impl Router {
    /// Create a router for the given prefix (`""`, `"v1"`, `"/api/v1/"`, ...).
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: split_path(prefix),
        }
    }

    /// Base path every route starts with: `""` or `"/v1"`.
    #[must_use]
    pub fn base_path(&self) -> String {
        self.prefix.iter().map(|s| format!("/{s}")).collect()
    }

    /// Resolve a request context into its path shape and the request value
    /// handed to data sources.
    ///
    /// # Errors
    ///
    /// `NotFound` when the path does not match the prefix or has the wrong
    /// number of segments.
    pub fn resolve(&self, ctx: RequestContext) -> Result<(RouteKind, ApiRequest), ApiError> {
        let rest = ctx
            .segments
            .strip_prefix(self.prefix.as_slice())
            .ok_or_else(|| route_not_found(&ctx.segments))?;

        let (resource, ids, relation) = match rest {
            [resource] => (resource.clone(), Vec::new(), None),
            [resource, ids] => (resource.clone(), split_ids(ids), None),
            [resource, ids, relation] => (resource.clone(), split_ids(ids), Some(relation.clone())),
            _ => return Err(route_not_found(&ctx.segments)),
        };

        let kind = match (&relation, ids.len()) {
            (None, 0) if rest.len() == 1 => RouteKind::Collection,
            (None, n) if n > 0 => RouteKind::Element,
            (Some(_), 1) => RouteKind::Relation,
            _ => return Err(route_not_found(&ctx.segments)),
        };

        let request = ApiRequest {
            method: ctx.method,
            resource,
            ids,
            relation,
            query: ctx.query,
            headers: ctx.headers,
            body: ctx.body,
        };

        Ok((kind, request))
    }
}

/// Map method and route shape to an operation.
fn identify_operation(
    method: &http::Method,
    kind: RouteKind,
    id_count: usize,
) -> Result<ApiOperation, ApiError> {
    use http::Method;

    if *method == Method::OPTIONS {
        return Ok(ApiOperation::Options);
    }

    match kind {
        RouteKind::Collection => match *method {
            Method::GET => Ok(ApiOperation::FindAll),
            Method::POST => Ok(ApiOperation::Create),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        RouteKind::Element if id_count == 1 => match *method {
            Method::GET => Ok(ApiOperation::FindOne),
            Method::PUT => Ok(ApiOperation::Update),
            Method::DELETE => Ok(ApiOperation::Delete),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        RouteKind::Element => match *method {
            Method::GET => Ok(ApiOperation::FindMultiple),
            Method::PUT | Method::POST | Method::DELETE => Err(ApiError::internal_error(format!(
                "{method} on {id_count} ids is not supported"
            ))),
            _ => Err(ApiError::method_not_allowed(method)),
        },
        RouteKind::Relation => match *method {
            Method::GET => Ok(ApiOperation::FindRelated),
            _ => Err(ApiError::method_not_allowed(method)),
        },
    }
}

/// Split an element segment into its comma-separated ids.
fn split_ids(segment: &str) -> Vec<String> {
    segment
        .split(',')
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn route_not_found(segments: &[String]) -> ApiError {
    ApiError::not_found(format!("no route for /{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use soyfr_api_model::{ApiErrorKind, QueryParams};

    use super::*;

    fn ctx(method: http::Method, path: &str) -> RequestContext {
        RequestContext {
            method,
            segments: split_path(path),
            query: QueryParams::new(),
            headers: http::HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    fn resolve(router: &Router, method: http::Method, path: &str) -> (Route, ApiRequest) {
        let (kind, req) = router.resolve(ctx(method, path)).unwrap();
        (Route::identify(kind, &req).unwrap(), req)
    }

    fn identify_err(method: http::Method, path: &str) -> ApiError {
        let (kind, req) = Router::default().resolve(ctx(method, path)).unwrap();
        Route::identify(kind, &req).unwrap_err()
    }

    #[test]
    fn test_should_route_collection() {
        let router = Router::default();
        let (route, req) = resolve(&router, http::Method::GET, "/posts");
        assert_eq!(route.kind, RouteKind::Collection);
        assert_eq!(route.operation, ApiOperation::FindAll);
        assert_eq!(req.resource, "posts");
        assert!(req.ids.is_empty());

        let (route, _) = resolve(&router, http::Method::POST, "/posts");
        assert_eq!(route.operation, ApiOperation::Create);
    }

    #[test]
    fn test_should_route_single_element() {
        let router = Router::default();
        let ops = [
            (http::Method::GET, ApiOperation::FindOne),
            (http::Method::PUT, ApiOperation::Update),
            (http::Method::DELETE, ApiOperation::Delete),
            (http::Method::OPTIONS, ApiOperation::Options),
        ];
        for (method, expected) in ops {
            let (route, req) = resolve(&router, method.clone(), "/posts/1");
            assert_eq!(route.kind, RouteKind::Element);
            assert_eq!(route.operation, expected, "failed for method: {method}");
            assert_eq!(req.ids, vec!["1"]);
        }
    }

    #[test]
    fn test_should_route_id_list_to_find_multiple() {
        let (route, req) = resolve(&Router::default(), http::Method::GET, "/posts/1,2");
        assert_eq!(route.operation, ApiOperation::FindMultiple);
        assert_eq!(req.ids, vec!["1", "2"]);
    }

    #[test]
    fn test_should_reject_writes_to_id_list_as_internal_error() {
        for method in [http::Method::PUT, http::Method::POST, http::Method::DELETE] {
            let err = identify_err(method, "/posts/1,2");
            assert_eq!(err.kind, ApiErrorKind::InternalServerError);
        }
    }

    #[test]
    fn test_should_route_relation() {
        let (route, req) = resolve(&Router::default(), http::Method::GET, "/posts/1/author");
        assert_eq!(route.kind, RouteKind::Relation);
        assert_eq!(route.operation, ApiOperation::FindRelated);
        assert_eq!(req.relation.as_deref(), Some("author"));
    }

    #[test]
    fn test_should_honor_prefix() {
        let router = Router::new("/v1/");
        assert_eq!(router.base_path(), "/v1");
        let (_, req) = resolve(&router, http::Method::GET, "/v1/posts");
        assert_eq!(req.resource, "posts");

        let err = router.resolve(ctx(http::Method::GET, "/posts")).unwrap_err();
        assert_eq!(err.status_code, http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_should_have_empty_base_path_without_prefix() {
        assert_eq!(Router::new("").base_path(), "");
        assert_eq!(Router::new("api/v1").base_path(), "/api/v1");
    }

    #[test]
    fn test_should_not_find_bad_shapes() {
        let router = Router::default();
        for path in ["/", "/posts/1/author/extra", "/posts/,", "/posts/1,2/author"] {
            let err = router.resolve(ctx(http::Method::GET, path)).unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::NotFound, "failed for path: {path}");
        }
    }

    #[test]
    fn test_should_reject_unsupported_methods() {
        for (method, path) in [
            (http::Method::PATCH, "/posts"),
            (http::Method::POST, "/posts/1"),
            (http::Method::DELETE, "/posts/1/author"),
        ] {
            let err = identify_err(method.clone(), path);
            assert_eq!(
                err.status_code,
                http::StatusCode::METHOD_NOT_ALLOWED,
                "failed for {method} {path}"
            );
        }
    }

    #[test]
    fn test_should_classify_path_without_checking_method() {
        let router = Router::default();
        let (kind, req) = router.resolve(ctx(http::Method::PATCH, "/unicorns")).unwrap();
        assert_eq!(kind, RouteKind::Collection);
        assert_eq!(req.method, http::Method::PATCH);

        let (kind, req) = router.resolve(ctx(http::Method::PUT, "/unicorns/1,2")).unwrap();
        assert_eq!(kind, RouteKind::Element);
        assert_eq!(req.ids, vec!["1", "2"]);
    }
}
