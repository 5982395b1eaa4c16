/// Configuration management for the API server
///
/// Configuration is loaded from environment variables (and a `.env` file in
/// development) into a type-safe struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_PRODUCTION`: Enables HSTS (default: false)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `AUTH_MODE`: `header` (trust `x-user-id`) or `jwt` (default: header)
/// - `JWT_SECRET`: HS256 secret, at least 32 characters; required in jwt mode
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use notebook_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Minimum length of the HS256 secret
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Production mode adds HSTS to every response
    pub production: bool,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// How the caller's identity is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Trust the `x-user-id` header set by an upstream gateway
    Header,

    /// Validate an HS256 bearer token
    Jwt,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Ok(AuthMode::Header),
            "jwt" => Ok(AuthMode::Jwt),
            other => anyhow::bail!("AUTH_MODE must be 'header' or 'jwt', got '{}'", other),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,

    /// HS256 secret; only present in jwt mode
    pub jwt_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` is missing
    /// - A numeric or enum variable has an invalid value
    /// - `AUTH_MODE=jwt` without a `JWT_SECRET` of at least 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let production = parse_bool(&env::var("API_PRODUCTION").unwrap_or_default());
        let cors_origins =
            parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let mode = env::var("AUTH_MODE")
            .unwrap_or_else(|_| "header".to_string())
            .parse::<AuthMode>()?;
        let auth = AuthConfig::new(mode, env::var("JWT_SECRET").ok())?;

        let log_format = env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .parse::<LogFormat>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                production,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            auth,
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

impl AuthConfig {
    /// Validates the secret requirement for the chosen mode
    pub fn new(mode: AuthMode, jwt_secret: Option<String>) -> anyhow::Result<Self> {
        match mode {
            AuthMode::Header => Ok(Self {
                mode,
                jwt_secret: None,
            }),
            AuthMode::Jwt => {
                let secret = jwt_secret.ok_or_else(|| {
                    anyhow::anyhow!("JWT_SECRET environment variable is required when AUTH_MODE=jwt")
                })?;

                if secret.len() < MIN_JWT_SECRET_LEN {
                    anyhow::bail!(
                        "JWT_SECRET must be at least {} characters long",
                        MIN_JWT_SECRET_LEN
                    );
                }

                Ok(Self {
                    mode,
                    jwt_secret: Some(secret),
                })
            }
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                production: false,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                mode: AuthMode::Header,
                jwt_secret: None,
            },
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_bind_address() {
        assert_eq!(test_config().bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_auth_mode_parsing() {
        assert_eq!("header".parse::<AuthMode>().unwrap(), AuthMode::Header);
        assert_eq!(" JWT ".parse::<AuthMode>().unwrap(), AuthMode::Jwt);
        assert!("oauth".parse::<AuthMode>().is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_jwt_mode_requires_long_secret() {
        assert!(AuthConfig::new(AuthMode::Jwt, None).is_err());
        assert!(AuthConfig::new(AuthMode::Jwt, Some("short".to_string())).is_err());

        let auth = AuthConfig::new(
            AuthMode::Jwt,
            Some("test-secret-key-at-least-32-bytes-long".to_string()),
        )
        .unwrap();
        assert!(auth.jwt_secret.is_some());
    }

    #[test]
    fn test_header_mode_drops_secret() {
        let auth = AuthConfig::new(AuthMode::Header, Some("whatever".to_string())).unwrap();
        assert!(auth.jwt_secret.is_none());
    }

    #[test]
    fn test_auth_debug_redacts_secret() {
        let auth = AuthConfig::new(
            AuthMode::Jwt,
            Some("test-secret-key-at-least-32-bytes-long".to_string()),
        )
        .unwrap();

        let debug = format!("{:?}", auth);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("test-secret-key"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("YES"));
        assert!(!parse_bool(""));
        assert!(!parse_bool("false"));
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example,,"),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(parse_origins("*"), vec!["*".to_string()]);
    }
}
