// ==========================================
// Order Batch Ingestion Service - Service settings
// ==========================================
// Deliberately minimal surface: listen address, database, JWT key,
// business timezone, batch size hint. No per-request configuration.
// ==========================================

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(name = "order-ingest")]
#[command(about = "Batch order ingestion service")]
#[command(version)]
pub struct Settings {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "data/orders.db")]
    pub database: String,

    /// HS256 key used to verify bearer tokens
    #[arg(long, env = "JWT_SECRET")]
    pub jwt_secret: String,

    /// Timezone that defines "today" for the delivery-date rule
    #[arg(long, env = "BUSINESS_TIMEZONE", default_value = "America/Lima")]
    pub timezone: String,

    /// Advisory upper bound on rows per upload (larger uploads are
    /// processed but logged)
    #[arg(long, env = "BATCH_SIZE_HINT", default_value_t = 500)]
    pub batch_size_hint: usize,
}

impl Settings {
    /// Resolve the configured timezone name to a Tz.
    pub fn business_tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .ok()
            .with_context(|| format!("unknown business timezone: {}", self.timezone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(timezone: &str) -> Settings {
        Settings {
            listen: "127.0.0.1:8080".parse().unwrap(),
            database: ":memory:".to_string(),
            jwt_secret: "secret".to_string(),
            timezone: timezone.to_string(),
            batch_size_hint: 500,
        }
    }

    #[test]
    fn test_default_timezone_resolves() {
        assert_eq!(settings("America/Lima").business_tz().unwrap(), chrono_tz::America::Lima);
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        assert!(settings("America/Atlantis").business_tz().is_err());
    }
}
