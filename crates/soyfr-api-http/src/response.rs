//! Response serialization and error formatting.

use serde::Serialize;
use soyfr_api_model::{ApiError, FieldError};

use crate::body::ApiResponseBody;
use crate::dispatch::ApiResponse;

/// Content type for JSON document responses.
pub const CONTENT_TYPE: &str = "application/vnd.api+json";

#[derive(Serialize)]
#[serde(untagged)]
enum ErrorObject<'a> {
    Status { status: &'a str, title: &'a str },
    Field(&'a FieldError),
}

#[derive(Serialize)]
struct ErrorDocument<'a> {
    errors: Vec<ErrorObject<'a>>,
}

/// Serialize an error into an errors document.
///
/// Without field errors the document holds a single status object:
///
/// ```json
/// {"errors": [{"status": "404", "title": "post not found"}]}
/// ```
///
/// With field errors the document holds only those:
///
/// ```json
/// {"errors": [{"id": "SomeErrorID", "path": "Title"}]}
/// ```
///
/// Returns `None` for errors rendered without a body.
#[must_use]
pub fn error_to_json(error: &ApiError) -> Option<Vec<u8>> {
    if !error.has_body() {
        return None;
    }

    let status = error.status_code.as_u16().to_string();
    let errors = if error.errors.is_empty() {
        vec![ErrorObject::Status {
            status: &status,
            title: &error.title,
        }]
    } else {
        error.errors.iter().map(ErrorObject::Field).collect()
    };

    serde_json::to_vec(&ErrorDocument { errors }).ok()
}

/// Convert an `ApiError` into a complete HTTP error response.
///
/// Internal errors become a bare 500 with no body.
#[must_use]
pub fn error_to_response(error: &ApiError, request_id: &str) -> http::Response<ApiResponseBody> {
    match error_to_json(error) {
        Some(json) => json_response(error.status_code, json, request_id),
        None => {
            let mut response = http::Response::new(ApiResponseBody::empty());
            *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
            set_request_id(&mut response, request_id);
            response
        }
    }
}

/// Build a response carrying a JSON document.
#[must_use]
pub fn json_response(
    status: http::StatusCode,
    json: Vec<u8>,
    request_id: &str,
) -> http::Response<ApiResponseBody> {
    let mut response = http::Response::new(ApiResponseBody::json(json));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(CONTENT_TYPE),
    );
    set_request_id(&mut response, request_id);
    response
}

/// Convert a dispatched result into an HTTP response.
///
/// # Errors
///
/// Fails when the document cannot be serialized or the `Location` header is
/// not a valid header value.
pub fn to_http_response(
    result: ApiResponse,
    request_id: &str,
) -> Result<http::Response<ApiResponseBody>, ApiError> {
    match result {
        ApiResponse::Document {
            status,
            document,
            location,
        } => {
            let mut response = json_response(status, document.to_json()?, request_id);
            if let Some(location) = location {
                let value = http::HeaderValue::from_str(&location).map_err(|e| {
                    ApiError::internal_error(format!("invalid location header {location}: {e}"))
                })?;
                response.headers_mut().insert(http::header::LOCATION, value);
            }
            Ok(response)
        }
        ApiResponse::NoContent { allow } => {
            let mut response = http::Response::new(ApiResponseBody::empty());
            *response.status_mut() = http::StatusCode::NO_CONTENT;
            if let Some(allow) = allow {
                response
                    .headers_mut()
                    .insert(http::header::ALLOW, http::HeaderValue::from_static(allow));
            }
            set_request_id(&mut response, request_id);
            Ok(response)
        }
    }
}

fn set_request_id(response: &mut http::Response<ApiResponseBody>, request_id: &str) {
    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", hv);
    }
}
