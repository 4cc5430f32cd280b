use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`). Must exceed the
    /// 60-second object-store upload bound or uploads get cut off early.
    pub request_timeout_secs: u64,
    /// Directory where upload bytes are staged before going to the object
    /// store (default: `/tmp/folio-staging`).
    pub staging_dir: PathBuf,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `90`                       |
    /// | `STAGING_DIR`          | `/tmp/folio-staging`       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "90".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let staging_dir =
            PathBuf::from(std::env::var("STAGING_DIR").unwrap_or_else(|_| "/tmp/folio-staging".into()));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            staging_dir,
            jwt,
        }
    }
}

/// Object-store configuration for the S3 gateway.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub public_base_url: String,
}

impl StorageConfig {
    /// Load object-store settings from environment variables.
    ///
    /// | Env Var                   | Required | Default     |
    /// |---------------------------|----------|-------------|
    /// | `STORAGE_BUCKET`          | **yes**  | --          |
    /// | `STORAGE_REGION`          | no       | `us-east-1` |
    /// | `STORAGE_ENDPOINT_URL`    | no       | (AWS)       |
    /// | `STORAGE_PUBLIC_BASE_URL` | **yes**  | --          |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing; misconfiguration should
    /// fail at startup, not on the first upload.
    pub fn from_env() -> Self {
        Self {
            bucket: std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET must be set"),
            region: std::env::var("STORAGE_REGION").unwrap_or_else(|_| "us-east-1".into()),
            endpoint_url: std::env::var("STORAGE_ENDPOINT_URL").ok(),
            public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL")
                .expect("STORAGE_PUBLIC_BASE_URL must be set"),
        }
    }
}
