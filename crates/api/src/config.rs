use civic_core::access::AccessPolicy;
use civic_core::validation::MAX_ATTACHMENTS_PER_REQUEST;
use civic_workflow::{WorkflowConfig, DEFAULT_MAX_ATTACHMENT_BYTES};

use crate::auth::jwt::JwtConfig;

/// Slack on top of the attachment payload for multipart framing and text fields.
const BODY_LIMIT_OVERHEAD_BYTES: usize = 1024 * 1024;

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
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Per-file upload limit in bytes (default: 10 MiB).
    pub max_attachment_bytes: usize,
    /// Let regular officials see and act on escalated issues in their
    /// categories (default: `false`).
    pub officials_handle_escalated: bool,
    /// Seconds between automatic escalation passes. `0` disables the sweeper.
    pub auto_escalation_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `MAX_ATTACHMENT_BYTES`          | `10485760`              |
    /// | `OFFICIALS_HANDLE_ESCALATED`    | `false`                 |
    /// | `AUTO_ESCALATION_INTERVAL_SECS` | `0`                     |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_attachment_bytes: usize = std::env::var("MAX_ATTACHMENT_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTACHMENT_BYTES.to_string())
            .parse()
            .expect("MAX_ATTACHMENT_BYTES must be a valid usize");

        let officials_handle_escalated = std::env::var("OFFICIALS_HANDLE_ESCALATED")
            .ok()
            .map(|v| parse_flag(&v).expect("OFFICIALS_HANDLE_ESCALATED must be true or false"))
            .unwrap_or(false);

        let auto_escalation_interval_secs: u64 = std::env::var("AUTO_ESCALATION_INTERVAL_SECS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("AUTO_ESCALATION_INTERVAL_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            max_attachment_bytes,
            officials_handle_escalated,
            auto_escalation_interval_secs,
        }
    }

    /// Engine settings derived from this configuration.
    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            policy: AccessPolicy {
                officials_handle_escalated: self.officials_handle_escalated,
            },
            max_attachment_bytes: self.max_attachment_bytes,
        }
    }

    /// Largest request body accepted, sized for a full set of attachments.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_attachment_bytes
            .saturating_mul(MAX_ATTACHMENTS_PER_REQUEST)
            .saturating_add(BODY_LIMIT_OVERHEAD_BYTES)
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a boolean switch. Accepts `true/false`, `1/0`, `yes/no`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
