#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` selects the in-memory user store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
}

/// Upper bound for `JWT_TTL_MINUTES` (one year).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let ttl_minutes = lookup("JWT_TTL_MINUTES")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| v.min(MAX_TTL_MINUTES))
            .unwrap_or(30);
        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());

        Ok(Self {
            database_url,
            jwt: JwtConfig {
                secret,
                ttl_minutes,
            },
        })
    }
}
