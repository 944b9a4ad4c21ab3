//! Configuration management for EduNeuro
//!
//! All configurable parameters in one place with environment variable overrides.
//! Sensible defaults for local development, configurable in production.

use std::env;
use std::path::PathBuf;
use tracing::info;

use crate::accounts::DEFAULT_PASSWORD_ROUNDS;

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Whether to allow credentials
    pub allow_credentials: bool,
    /// Max age for preflight cache (seconds)
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "DELETE".to_string(),
                "OPTIONS".to_string(),
            ],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "Authorization".to_string(),
                "X-API-Key".to_string(),
            ],
            allow_credentials: false,
            max_age_seconds: 86400,
        }
    }
}

impl CorsConfig {
    /// Load from environment variables
    ///
    /// In production mode (EDUNEURO_ENV=production), warns if CORS origins are not configured.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(origins) = env::var("EDUNEURO_CORS_ORIGINS") {
            config.allowed_origins = split_list(&origins, false);
        }

        if let Ok(methods) = env::var("EDUNEURO_CORS_METHODS") {
            config.allowed_methods = split_list(&methods, true);
        }

        if let Ok(headers) = env::var("EDUNEURO_CORS_HEADERS") {
            config.allowed_headers = split_list(&headers, false);
        }

        if let Ok(val) = env::var("EDUNEURO_CORS_CREDENTIALS") {
            config.allow_credentials = parse_bool(&val);
        }

        if let Ok(val) = env::var("EDUNEURO_CORS_MAX_AGE") {
            if let Ok(n) = val.parse() {
                config.max_age_seconds = n;
            }
        }

        if is_production_env() && config.allowed_origins.is_empty() {
            tracing::warn!(
                "PRODUCTION WARNING: CORS allows all origins. Set EDUNEURO_CORS_ORIGINS to restrict."
            );
        }

        config
    }

    /// Check if any origin restrictions are configured
    pub fn is_restricted(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    /// Convert to tower-http CorsLayer
    pub fn to_layer(&self) -> tower_http::cors::CorsLayer {
        use tower_http::cors::{AllowOrigin, Any, CorsLayer};

        let mut layer = CorsLayer::new();

        if self.allowed_origins.is_empty() {
            layer = layer.allow_origin(Any);
        } else {
            let mut valid_origins = Vec::new();
            for origin_str in &self.allowed_origins {
                match origin_str.parse::<axum::http::HeaderValue>() {
                    Ok(origin) => valid_origins.push(origin),
                    Err(_) => tracing::warn!("CORS: Invalid origin '{}' - skipping", origin_str),
                }
            }

            if valid_origins.is_empty() {
                // Every configured origin was rejected; deny rather than fall back to Any.
                tracing::error!(
                    "CORS: All {} configured origin(s) failed to parse. Rejecting cross-origin requests.",
                    self.allowed_origins.len()
                );
            }
            layer = layer.allow_origin(AllowOrigin::list(valid_origins));
        }

        let methods: Vec<axum::http::Method> = self
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        if methods.is_empty() {
            layer = layer.allow_methods(Any);
        } else {
            layer = layer.allow_methods(methods);
        }

        let headers: Vec<axum::http::HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        if headers.is_empty() {
            layer = layer.allow_headers(Any);
        } else {
            layer = layer.allow_headers(headers);
        }

        // Credentials cannot be combined with a wildcard origin.
        if self.allow_credentials && self.is_restricted() {
            layer = layer.allow_credentials(true);
        }

        layer.max_age(std::time::Duration::from_secs(self.max_age_seconds))
    }
}

/// Language model connection settings (OpenAI-compatible API)
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key; empty disables the model and every operation uses the rule-based path
    pub api_key: String,
    /// Chat completion model (default: gpt-4o-mini)
    pub model: String,
    /// Base URL of the API (default: https://api.openai.com)
    pub base_url: String,
    /// Speech synthesis model (default: tts-1)
    pub tts_model: String,
    /// HTTP timeout for model calls in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            tts_model: "tts-1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = env::var("OPENAI_API_KEY") {
            config.api_key = val.trim().to_string();
        }
        if let Ok(val) = env::var("OPENAI_MODEL") {
            if !val.trim().is_empty() {
                config.model = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var("OPENAI_BASE_URL") {
            if !val.trim().is_empty() {
                config.base_url = val.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(val) = env::var("OPENAI_TTS_MODEL") {
            if !val.trim().is_empty() {
                config.tts_model = val.trim().to_string();
            }
        }
        if let Ok(val) = env::var("EDUNEURO_LLM_TIMEOUT") {
            if let Ok(n) = val.parse() {
                config.timeout_secs = n;
            }
        }

        config
    }

    /// Whether a model is configured at all
    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Server configuration loaded from environment with defaults
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address (default: 127.0.0.1)
    pub host: String,

    /// Server port (default: 8000)
    pub port: u16,

    /// Storage path for RocksDB, uploaded files and audio (default: ./eduneuro_data)
    pub storage_path: PathBuf,

    /// Base URL used when building audio links (default: http://127.0.0.1:8000)
    pub public_base_url: String,

    /// Maximum upload size in megabytes (default: 10)
    pub max_file_size_mb: usize,

    /// Maximum extracted text length in characters (default: 50000)
    pub max_text_length: usize,

    /// Maximum number of PDF pages (default: 100)
    pub max_pdf_pages: usize,

    /// Hard cap on summary length in words (default: 500)
    pub max_summary_words: usize,

    /// Maximum concurrent requests (default: 200)
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds (default: 60)
    pub request_timeout_secs: u64,

    /// Require X-API-Key on API routes (default: false)
    pub require_auth: bool,

    /// PBKDF2 rounds for new account passwords (default: 100000)
    pub password_hash_rounds: u32,

    /// Lifetime of a login token in minutes (default: 10080, one week)
    pub session_ttl_minutes: i64,

    /// Whether running in production mode
    pub is_production: bool,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Language model configuration
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            storage_path: PathBuf::from("./eduneuro_data"),
            public_base_url: "http://127.0.0.1:8000".to_string(),
            max_file_size_mb: 10,
            max_text_length: 50_000,
            max_pdf_pages: 100,
            max_summary_words: 500,
            max_concurrent_requests: 200,
            request_timeout_secs: 60,
            require_auth: false,
            password_hash_rounds: DEFAULT_PASSWORD_ROUNDS,
            session_ttl_minutes: 7 * 24 * 60,
            is_production: false,
            cors: CorsConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    #[allow(clippy::field_reassign_with_default)]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.is_production = is_production_env();

        if let Ok(val) = env::var("EDUNEURO_HOST") {
            config.host = val;
        }

        if let Ok(val) = env::var("EDUNEURO_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        if let Ok(val) = env::var("EDUNEURO_DATA_PATH") {
            config.storage_path = PathBuf::from(val);
        }

        if let Ok(val) = env::var("EDUNEURO_PUBLIC_URL") {
            config.public_base_url = val.trim_end_matches('/').to_string();
        } else {
            config.public_base_url = format!("http://{}:{}", config.host, config.port);
        }

        if let Ok(val) = env::var("MAX_FILE_SIZE_MB") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_file_size_mb = n.max(1);
            }
        }

        if let Ok(val) = env::var("MAX_TEXT_LENGTH") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_text_length = n.max(1);
            }
        }

        if let Ok(val) = env::var("MAX_PDF_PAGES") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_pdf_pages = n.max(1);
            }
        }

        if let Ok(val) = env::var("MAX_SUMMARY_LENGTH") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_summary_words = n.clamp(50, 2000);
            }
        }

        if let Ok(val) = env::var("EDUNEURO_MAX_CONCURRENT") {
            if let Ok(n) = val.parse() {
                config.max_concurrent_requests = n;
            }
        }

        if let Ok(val) = env::var("EDUNEURO_REQUEST_TIMEOUT") {
            if let Ok(n) = val.parse() {
                config.request_timeout_secs = n;
            }
        }

        if let Ok(val) = env::var("EDUNEURO_REQUIRE_AUTH") {
            config.require_auth = parse_bool(&val);
        }

        if let Ok(val) = env::var("EDUNEURO_PASSWORD_ROUNDS") {
            if let Ok(n) = val.parse::<u32>() {
                config.password_hash_rounds = n.max(1_000);
            }
        }

        if let Ok(val) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            if let Ok(n) = val.parse::<i64>() {
                config.session_ttl_minutes = n.max(1);
            }
        }

        config.cors = CorsConfig::from_env();
        config.llm = LlmConfig::from_env();

        config
    }

    /// Upload limit in bytes
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Log the current configuration
    pub fn log(&self) {
        info!("Configuration:");
        info!(
            "   Mode: {}",
            if self.is_production {
                "PRODUCTION"
            } else {
                "Development"
            }
        );
        info!("   Bind: {}:{}", self.host, self.port);
        info!("   Storage: {:?}", self.storage_path);
        info!("   Public URL: {}", self.public_base_url);
        info!(
            "   Limits: {} MB upload, {} chars text, {} PDF pages, {} summary words",
            self.max_file_size_mb, self.max_text_length, self.max_pdf_pages, self.max_summary_words
        );
        info!("   Max concurrent: {}", self.max_concurrent_requests);
        info!("   Request timeout: {}s", self.request_timeout_secs);
        info!(
            "   Auth: {}",
            if self.require_auth {
                "API key required"
            } else {
                "disabled"
            }
        );
        info!("   Login tokens: valid {} minutes", self.session_ttl_minutes);
        if self.cors.is_restricted() {
            info!("   CORS origins: {:?}", self.cors.allowed_origins);
        } else {
            info!("   CORS: Permissive (all origins allowed)");
        }
        if self.llm.is_enabled() {
            info!(
                "   Language model: {} via {} (tts: {})",
                self.llm.model, self.llm.base_url, self.llm.tts_model
            );
        } else {
            info!("   Language model: not configured, using rule-based processing");
        }
    }
}

fn is_production_env() -> bool {
    env::var("EDUNEURO_ENV")
        .map(|v| {
            let v = v.to_lowercase();
            v == "production" || v == "prod"
        })
        .unwrap_or(false)
}

fn parse_bool(val: &str) -> bool {
    let v = val.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes"
}

fn split_list(raw: &str, uppercase: bool) -> Vec<String> {
    raw.split(',')
        .map(|s| {
            let s = s.trim();
            if uppercase {
                s.to_uppercase()
            } else {
                s.to_string()
            }
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Environment variable documentation
pub fn print_env_help() {
    println!("EduNeuro Configuration Environment Variables:");
    println!();
    println!("  EDUNEURO_ENV              - Set to 'production' or 'prod' for production mode");
    println!("  EDUNEURO_HOST             - Bind address (default: 127.0.0.1)");
    println!("  EDUNEURO_PORT             - Server port (default: 8000)");
    println!("  EDUNEURO_DATA_PATH        - Storage directory (default: ./eduneuro_data)");
    println!("  EDUNEURO_PUBLIC_URL       - Base URL for audio links (default: http://HOST:PORT)");
    println!("  EDUNEURO_REQUIRE_AUTH     - Require X-API-Key on API routes (default: false)");
    println!("  EDUNEURO_API_KEYS         - Comma-separated API keys");
    println!("  EDUNEURO_MAX_CONCURRENT   - Max concurrent requests (default: 200)");
    println!("  EDUNEURO_REQUEST_TIMEOUT  - Request timeout in seconds (default: 60)");
    println!();
    println!("Accounts:");
    println!("  EDUNEURO_PASSWORD_ROUNDS  - PBKDF2 rounds for new passwords (default: 100000)");
    println!("  ACCESS_TOKEN_EXPIRE_MINUTES - Login token lifetime (default: 10080)");
    println!();
    println!("Document limits:");
    println!("  MAX_FILE_SIZE_MB          - Upload size limit (default: 10)");
    println!("  MAX_TEXT_LENGTH           - Extracted text limit in characters (default: 50000)");
    println!("  MAX_PDF_PAGES             - PDF page limit (default: 100)");
    println!("  MAX_SUMMARY_LENGTH        - Summary word cap (default: 500)");
    println!();
    println!("Language model:");
    println!("  OPENAI_API_KEY            - Enables model-backed processing when set");
    println!("  OPENAI_MODEL              - Chat model (default: gpt-4o-mini)");
    println!("  OPENAI_BASE_URL           - API base URL (default: https://api.openai.com)");
    println!("  OPENAI_TTS_MODEL          - Speech model (default: tts-1)");
    println!("  EDUNEURO_LLM_TIMEOUT      - Model call timeout in seconds (default: 30)");
    println!();
    println!("CORS Configuration:");
    println!("  EDUNEURO_CORS_ORIGINS     - Comma-separated allowed origins (default: all)");
    println!("  EDUNEURO_CORS_METHODS     - Comma-separated allowed methods");
    println!("  EDUNEURO_CORS_HEADERS     - Comma-separated allowed headers");
    println!("  EDUNEURO_CORS_CREDENTIALS - Allow credentials true/false (default: false)");
    println!("  EDUNEURO_CORS_MAX_AGE     - Preflight cache seconds (default: 86400)");
    println!();
    println!("  RUST_LOG                  - Log level (e.g., info, debug, trace)");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.max_text_length, 50_000);
        assert_eq!(config.max_pdf_pages, 100);
        assert!(!config.require_auth);
        assert_eq!(config.session_ttl_minutes, 10_080);
        assert_eq!(config.password_hash_rounds, DEFAULT_PASSWORD_ROUNDS);
        assert!(!config.llm.is_enabled());
    }

    #[test]
    fn test_max_file_size_bytes() {
        let config = ServerConfig {
            max_file_size_mb: 2,
            ..Default::default()
        };
        assert_eq!(config.max_file_size_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_env_override() {
        env::set_var("EDUNEURO_PORT", "8081");
        env::set_var("MAX_PDF_PAGES", "12");
        env::set_var("EDUNEURO_REQUIRE_AUTH", "true");

        let config = ServerConfig::from_env();
        assert_eq!(config.port, 8081);
        assert_eq!(config.max_pdf_pages, 12);
        assert!(config.require_auth);

        env::remove_var("EDUNEURO_PORT");
        env::remove_var("MAX_PDF_PAGES");
        env::remove_var("EDUNEURO_REQUIRE_AUTH");
    }

    #[test]
    fn test_cors_default_is_permissive() {
        let cors = CorsConfig::default();
        assert!(!cors.is_restricted());
        assert!(!cors.allowed_methods.is_empty());
        let _layer = cors.to_layer();
    }

    #[test]
    fn test_cors_with_origins_is_restricted() {
        let cors = CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: true,
            ..Default::default()
        };
        assert!(cors.is_restricted());
        let _layer = cors.to_layer();
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" get, post ,,", true), vec!["GET", "POST"]);
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
    }
}
