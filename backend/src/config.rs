use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite:martial_arts.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "3001";

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Allowed browser origin; any origin is allowed when unset
    pub cors_origin: Option<String>,
    /// Directory holding the built frontend, served as the fallback route
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            cors_origin: None,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            host: env::var("HOST")
                .unwrap_or_else(|_| DEFAULT_HOST.to_string())
                .parse()
                .context("HOST must be a valid IP address")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|origin| !origin.is_empty()),
            static_dir: env::var("STATIC_DIR").ok().map(PathBuf::from),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
