//! Security headers and request screening

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::types::ApiError;

/// Maximum request body size (10 MB)
pub const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Adds the standard hardening headers to every response
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );

    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, no-cache, must-revalidate"),
        );
    }

    response
}

/// Rejects traversal attempts and oversized declared bodies before routing
pub async fn request_guard_middleware(request: Request<Body>, next: Next) -> Response {
    if let Err(e) = validate_request_security(request.uri().path()) {
        return e.into_response();
    }

    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    if let Err(e) = validate_content_length(content_length) {
        return e.into_response();
    }

    next.run(request).await
}

pub fn validate_content_length(content_length: Option<usize>) -> Result<(), ApiError> {
    match content_length {
        Some(len) if len > MAX_BODY_SIZE => Err(ApiError::new(
            axum::http::StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "Request body too large: {} bytes (max: {} bytes)",
                len, MAX_BODY_SIZE
            ),
        )),
        _ => Ok(()),
    }
}

pub fn validate_request_security(path: &str) -> Result<(), ApiError> {
    if path.contains("..") || path.contains("//") {
        return Err(ApiError::bad_request("Invalid path: path traversal detected"));
    }

    if path.contains('\0') {
        return Err(ApiError::bad_request(
            "Invalid request: prohibited characters",
        ));
    }

    Ok(())
}
