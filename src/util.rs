//! Shared helpers: env/tracing bootstrap, HTTP client construction, CORS,
//! and the application state handed to actix workers.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::completion::{ChatCompletionClient, CompletionConfig};
use crate::converter::CodeConverter;

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// An explicit env file can be named via ENV_FILE; otherwise the standard
/// `.env` discovery applies. The subscriber is installed after the env file
/// loads so a RUST_LOG set there is honored.
pub fn init_tracing() {
    let mut env_source: String = "none".into();

    if let Ok(path) = std::env::var("ENV_FILE") {
        let path = path.trim();
        if !path.is_empty()
            && std::path::Path::new(path).is_file()
            && dotenvy::from_filename(path).is_ok()
        {
            env_source = format!("{path} (ENV_FILE)");
        }
    }

    if env_source == "none" && dotenvy::dotenv().is_ok() {
        env_source = ".env".into();
    }

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Get the bind address for the HTTP server from env or default to 0.0.0.0:8080.
pub fn env_bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into())
}

/// Shared application state used by the HTTP server and handlers.
///
/// Constructed once at startup; the completion client inside the converter is
/// the process-wide upstream handle, so there is no lazy first-use
/// initialization to race on.
pub struct AppState {
    pub converter: CodeConverter,
    /// Deployment/model identifier reported by `/status`.
    pub model: String,
}

impl AppState {
    pub fn new(converter: CodeConverter, model: impl Into<String>) -> Self {
        Self {
            converter,
            model: model.into(),
        }
    }

    /// Build the full state from environment configuration.
    ///
    /// Fails when any of the required upstream settings is missing, aborting
    /// startup rather than deferring the fault to the first request.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = CompletionConfig::from_env()?;
        let model = config.model.clone();
        let client = ChatCompletionClient::new(build_http_client_from_env(), config);
        Ok(Self::new(CodeConverter::new(Arc::new(client)), model))
    }
}

/// Build an HTTP client honoring proxy and timeout environment variables.
///
/// Environment:
/// - CODEMORPH_NO_PROXY = 1|true|yes|on   -> disable all proxies
/// - CODEMORPH_PROXY_URL = <url>          -> proxy for all schemes
/// - HTTP_PROXY / HTTPS_PROXY             -> scheme-specific proxies
/// - CODEMORPH_HTTP_TIMEOUT_SECONDS       -> overall request timeout (u64)
pub fn build_http_client_from_env() -> reqwest::Client {
    let mut builder = reqwest::Client::builder();

    if let Ok(secs) = std::env::var("CODEMORPH_HTTP_TIMEOUT_SECONDS") {
        if let Ok(n) = secs.trim().parse::<u64>() {
            builder = builder.timeout(std::time::Duration::from_secs(n));
        }
    }

    let no_proxy = std::env::var("CODEMORPH_NO_PROXY")
        .map(|v| v.trim().to_ascii_lowercase())
        .map(|v| v == "1" || v == "true" || v == "yes" || v == "on")
        .unwrap_or(false);

    if no_proxy {
        builder = builder.no_proxy();
    } else {
        if let Ok(url) = std::env::var("CODEMORPH_PROXY_URL") {
            let u = url.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::all(u) {
                    builder = builder.proxy(p);
                }
            }
        }
        if let Ok(http_p) = std::env::var("HTTP_PROXY").or_else(|_| std::env::var("http_proxy")) {
            let u = http_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::http(u) {
                    builder = builder.proxy(p);
                }
            }
        }
        if let Ok(https_p) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("https_proxy"))
        {
            let u = https_p.trim();
            if !u.is_empty() {
                if let Ok(p) = reqwest::Proxy::https(u) {
                    builder = builder.proxy(p);
                }
            }
        }
    }

    builder = builder.user_agent(format!("codemorph/{}", env!("CARGO_PKG_VERSION")));

    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Build CORS settings from environment. Defaults to a permissive policy
/// (any origin, method, and header) matching the browser-facing use of the
/// conversion endpoint.
///
/// Environment:
/// - CORS_ALLOWED_ORIGINS = * | comma-separated origins
/// - CORS_ALLOW_CREDENTIALS = 1|true|yes|on
/// - CORS_MAX_AGE = <seconds>
pub fn cors_config_from_env() -> actix_cors::Cors {
    let mut cors = actix_cors::Cors::default()
        .allow_any_method()
        .allow_any_header();

    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(origins) if origins.trim() != "*" => {
            for part in origins.split(',') {
                let p = part.trim();
                if !p.is_empty() {
                    cors = cors.allowed_origin(p);
                }
            }
        }
        _ => {
            cors = cors.allow_any_origin();
        }
    }

    if let Ok(val) = std::env::var("CORS_ALLOW_CREDENTIALS") {
        let v = val.trim().to_ascii_lowercase();
        if v == "1" || v == "true" || v == "yes" || v == "on" {
            cors = cors.supports_credentials();
        }
    }

    if let Ok(secs) = std::env::var("CORS_MAX_AGE") {
        if let Ok(n) = secs.trim().parse::<usize>() {
            cors = cors.max_age(n);
        }
    }

    cors
}
