use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub session_hours: i64,
    pub reset_token_minutes: i64,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        let jwt_secret = env_required("TASKBOARD_JWT_SECRET")?;

        let host: IpAddr = env_or("TASKBOARD_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_HOST: {e}"))?;

        let port: u16 = env_or("TASKBOARD_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_PORT: {e}"))?;

        let base_url = env_or("TASKBOARD_BASE_URL", &format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let session_hours: i64 = env_or("TASKBOARD_SESSION_HOURS", "12")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_SESSION_HOURS: {e}"))?;

        let reset_token_minutes: i64 = env_or("TASKBOARD_RESET_TOKEN_MINUTES", "60")
            .parse()
            .map_err(|e| format!("Invalid TASKBOARD_RESET_TOKEN_MINUTES: {e}"))?;

        if session_hours <= 0 || reset_token_minutes <= 0 {
            return Err("Session and reset token lifetimes must be positive".to_string());
        }

        let log_level = env_or("TASKBOARD_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("TASKBOARD_SMTP_HOST").ok(),
            std::env::var("TASKBOARD_SMTP_PORT").ok(),
            std::env::var("TASKBOARD_SMTP_USER").ok(),
            std::env::var("TASKBOARD_SMTP_PASS").ok(),
            std::env::var("TASKBOARD_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid TASKBOARD_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            base_url,
            session_hours,
            reset_token_minutes,
            log_level,
            smtp,
        })
    }

    /// Cookies are only marked `Secure` when the app is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
