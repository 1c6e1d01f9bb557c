use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware that logs every HTTP request
///
/// One line per request: status, method, path, duration (ms) and response
/// size in bytes. Server errors are logged at `warn`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Buffer the body to learn its real size
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                "{} {} {} | {}ms | body error: {}",
                parts.status.as_u16(),
                method,
                path,
                start.elapsed().as_millis(),
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis();
    let size = format_number(bytes.len());

    if parts.status.is_server_error() {
        tracing::warn!(
            "{} {} {} | {}ms | {} B",
            parts.status.as_u16(),
            method,
            path,
            elapsed_ms,
            size
        );
    } else {
        tracing::info!(
            "{} {} {} | {}ms | {} B",
            parts.status.as_u16(),
            method,
            path,
            elapsed_ms,
            size
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
