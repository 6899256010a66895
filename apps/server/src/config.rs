use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    /// Insert the demo proposals when the table is empty.
    pub seed_sample_data: bool,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let raw_addr = env_or("CM_LISTEN_ADDR", "0.0.0.0:8080");
        let listen_addr: SocketAddr = raw_addr
            .parse()
            .with_context(|| format!("Invalid CM_LISTEN_ADDR: {}", raw_addr))?;
        let db_path = env_or("CM_DB_PATH", "./db/app.db");
        let cors_allow = env_or("CM_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("CM_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let static_dir = env_or("CM_STATIC_DIR", "dist");
        let seed_sample_data = !matches!(
            env_or("CM_SEED_SAMPLE_DATA", "true").to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        );
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            seed_sample_data,
        })
    }
}
