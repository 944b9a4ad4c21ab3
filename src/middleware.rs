//! HTTP request tracking middleware for observability

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Middleware to track HTTP request latency and counts
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();
    let normalized_path = normalize_path(&path);

    crate::metrics::HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &normalized_path, &status])
        .observe(duration);

    crate::metrics::HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &normalized_path, &status])
        .inc();

    response
}

/// Normalize path to prevent metric cardinality explosion
/// /documents/550e8400-e29b-41d4-a716-446655440000 -> /documents/{id}
fn normalize_path(path: &str) -> String {
    let normalized: Vec<&str> = path
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| if is_id(part) { "{id}" } else { part })
        .collect();

    format!("/{}", normalized.join("/"))
}

/// Check if a path segment looks like an ID (UUID, audio file name, numeric)
fn is_id(segment: &str) -> bool {
    if segment.contains('-') && segment.len() >= 32 {
        return true;
    }

    if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    segment.len() > 20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/documents/550e8400-e29b-41d4-a716-446655440000"),
            "/documents/{id}"
        );
        assert_eq!(
            normalize_path("/tts/audio/550e8400-e29b-41d4-a716-446655440000.mp3"),
            "/tts/audio/{id}"
        );
        assert_eq!(normalize_path("/health"), "/health");
        assert_eq!(normalize_path("/documents/upload"), "/documents/upload");
        assert_eq!(normalize_path("/"), "/");
    }
}
