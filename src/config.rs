use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub media_root: String,
    pub media_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let media_root = env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        let mut media_url = env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string());
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            media_root,
            media_url,
        })
    }

    /// Public URL for a stored media path.
    pub fn media_url_for(&self, path: &str) -> String {
        format!("{}{}", self.media_url, path.trim_start_matches('/'))
    }
}
