use anyhow::Context;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct HashConfig {
    pub time_cost: u32,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from_name: String,
    pub notify_to: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub hash: HashConfig,
    pub smtp: SmtpConfig,
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let hash = HashConfig {
            time_cost: std::env::var("HASH_TIME_COST")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(argon2::Params::DEFAULT_T_COST),
        };
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").context("SMTP_HOST is required")?,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(465),
            user: std::env::var("SMTP_USER").context("SMTP_USER is required")?,
            pass: std::env::var("SMTP_PASS").context("SMTP_PASS is required")?,
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or_else(|_| "Banaja Travels".into()),
            notify_to: std::env::var("NOTIFY_EMAIL")
                .unwrap_or_else(|_| "service@banajatravels.com".into()),
        };
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt,
            hash,
            smtp,
            cookie_secure,
        })
    }
}
