use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// S3-compatible bucket the media host serves uploaded images from.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    /// Argon2 iteration cost used when hashing new passwords.
    pub password_hash_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "medblog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "medblog-users".into()),
            ttl_minutes: parse_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: parse_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let media = MediaConfig {
            endpoint: std::env::var("MEDIA_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("MEDIA_BUCKET").unwrap_or_else(|_| "medblog".into()),
            access_key: std::env::var("MEDIA_ACCESS_KEY").unwrap_or_default(),
            secret_key: std::env::var("MEDIA_SECRET_KEY").unwrap_or_default(),
            region: std::env::var("MEDIA_REGION").unwrap_or_else(|_| "us-east-1".into()),
            public_url: std::env::var("MEDIA_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:9000/medblog".into()),
        };
        Ok(Self {
            database_url,
            jwt,
            media,
            password_hash_cost: parse_or("PASSWORD_HASH_COST", 12),
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
