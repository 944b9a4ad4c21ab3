//! API key authentication for the protected API routes
//!
//! Only installed when `EDUNEURO_REQUIRE_AUTH` is set; the default deployment
//! serves the API without credentials.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::env;

use crate::errors::ErrorResponse;

const DEV_API_KEY: &str = "eduneuro-dev-key-change-in-production";

/// API Key authentication errors
#[derive(Debug)]
pub enum AuthError {
    MissingApiKey,
    InvalidApiKey,
    NotConfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingApiKey => (
                StatusCode::UNAUTHORIZED,
                "MISSING_API_KEY",
                "Missing X-API-Key header",
            ),
            AuthError::InvalidApiKey => {
                (StatusCode::UNAUTHORIZED, "INVALID_API_KEY", "Invalid API key")
            }
            AuthError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_NOT_CONFIGURED",
                "API keys not configured. Set EDUNEURO_API_KEYS environment variable.",
            ),
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Constant-time string comparison
///
/// Leaks only the length of the shorter input, which is not secret for API keys.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    let mut result = (a.len() ^ b.len()) as u8;

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    for i in 0..a.len().min(b.len()) {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

/// Validate API key against configured keys
pub fn validate_api_key(provided_key: &str) -> Result<(), AuthError> {
    let valid_keys = match env::var("EDUNEURO_API_KEYS") {
        Ok(keys) if !keys.trim().is_empty() => keys,
        _ => {
            let is_production = env::var("EDUNEURO_ENV")
                .map(|v| v.to_lowercase() == "production" || v.to_lowercase() == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!("EDUNEURO_API_KEYS not set in production mode");
                return Err(AuthError::NotConfigured);
            }

            tracing::warn!("EDUNEURO_API_KEYS not set - using development key");
            DEV_API_KEY.to_string()
        }
    };

    // No early exit: every configured key is compared.
    let mut found = false;
    for key in valid_keys.split(',').map(|k| k.trim()) {
        if constant_time_compare(key, provided_key) {
            found = true;
        }
    }

    if found {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

/// Authentication middleware
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let api_key_value = match request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
    {
        Some(key) => key,
        None => return AuthError::MissingApiKey.into_response(),
    };

    if let Err(e) = validate_api_key(&api_key_value) {
        return e.into_response();
    }

    next.run(request).await
}
