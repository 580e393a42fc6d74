use crate::app::providers::simulated::{DEFAULT_CANCELLATION_DELAY, DEFAULT_DISCOVERY_DELAY};
use crate::config::MAX_DELAY_MS;
use crate::core::{ConfigProvider, Subscription};
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_range, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tryout")]
#[command(about = "Manage all your subscriptions in one place")]
pub struct CliConfig {
    /// Log in with this email right away
    #[arg(long)]
    pub email: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Simulated discovery delay in milliseconds
    #[arg(long)]
    pub discovery_delay_ms: Option<u64>,

    /// Simulated cancellation delay in milliseconds
    #[arg(long)]
    pub cancellation_delay_ms: Option<u64>,

    /// Make every discovery fail
    #[arg(long)]
    pub fail_discovery: bool,

    /// Make every cancellation fail
    #[arg(long)]
    pub fail_cancellation: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl ConfigProvider for CliConfig {
    fn discovery_delay(&self) -> Duration {
        self.discovery_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DISCOVERY_DELAY)
    }

    fn cancellation_delay(&self) -> Duration {
        self.cancellation_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CANCELLATION_DELAY)
    }

    fn fail_discovery(&self) -> bool {
        self.fail_discovery
    }

    fn fail_cancellation(&self) -> bool {
        self.fail_cancellation
    }

    fn seed_subscriptions(&self) -> Option<&[Subscription]> {
        None
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            validate_email("--email", email)?;
        }
        if let Some(ms) = self.discovery_delay_ms {
            validate_range("--discovery-delay-ms", ms, 0, MAX_DELAY_MS)?;
        }
        if let Some(ms) = self.cancellation_delay_ms {
            validate_range("--cancellation-delay-ms", ms, 0, MAX_DELAY_MS)?;
        }
        Ok(())
    }
}
