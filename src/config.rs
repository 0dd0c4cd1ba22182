use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cors_origin: String,
    pub mail_api_key: String,
    pub mail_domain: String,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "clickconnect.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "changeme".to_string()),
            token_ttl_hours: env::var("JWT_EXPIRES_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(168),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or_default(),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_domain: env::var("MAIL_DOMAIN").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "ClickConnect <no-reply@clickconnect.local>".to_string()),
        }
    }
}
