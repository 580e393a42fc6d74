#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

/// Upper bound for any simulated delay.
pub const MAX_DELAY_MS: u64 = 60_000;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use toml_config::TomlConfig;
