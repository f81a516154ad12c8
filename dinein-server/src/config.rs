//! Server configuration

use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HMAC secret for staff session tokens
    pub jwt_secret: String,
    /// HMAC secret for table QR tokens
    pub qr_jwt_secret: String,
    /// Guest app origin used to build QR links
    pub client_base_url: String,
    /// Local directory for uploaded photos
    pub upload_dir: PathBuf,
    /// Restaurant identifier embedded in QR tokens
    pub restaurant_id: String,
    /// Optional bootstrap admin account (created at startup if absent)
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            qr_jwt_secret: Self::require_secret("QR_JWT_SECRET", &environment)?,
            environment,
            client_base_url: std::env::var("CLIENT_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            restaurant_id: std::env::var("RESTAURANT_ID")
                .unwrap_or_else(|_| "demo-restaurant".into()),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_secret_falls_back() {
        let secret =
            Config::require_secret("DINEIN_TEST_UNSET_SECRET_A", "development").unwrap();
        assert_eq!(secret, "dev-DINEIN_TEST_UNSET_SECRET_A-not-for-production");
    }

    #[test]
    fn production_secret_is_required() {
        let err = Config::require_secret("DINEIN_TEST_UNSET_SECRET_B", "production").unwrap_err();
        assert!(err.to_string().contains("must be set in production"));
    }
}
