use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Base URL of the remote payment-resolution endpoint.
    pub remote_pay_url: String,
    /// Call-level timeout on the remote channel.
    pub remote_timeout: Duration,
    /// Minimum perceived-processing latency before a receipt is revealed.
    pub min_latency: Duration,
    /// Simulated settlement time on the server-side /pay endpoint.
    pub processing_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        let config = Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            remote_pay_url: env::var("REMOTE_PAY_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
            remote_timeout: Duration::from_millis(
                env::var("REMOTE_TIMEOUT_MS")
                    .unwrap_or_else(|_| "4000".to_string())
                    .parse()?,
            ),
            min_latency: Duration::from_millis(
                env::var("MIN_LATENCY_MS")
                    .unwrap_or_else(|_| "1500".to_string())
                    .parse()?,
            ),
            processing_delay: Duration::from_millis(
                env::var("PROCESSING_DELAY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()?,
            ),
        };

        url::Url::parse(&config.remote_pay_url).context("REMOTE_PAY_URL is not a valid URL")?;

        Ok(config)
    }
}
