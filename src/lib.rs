pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, LogFormat};
pub use crate::config::TomlConfig;

pub use crate::app::providers::SimulatedProvider;
pub use crate::app::shell::{parse_command, Command, Shell, ShellOutput};
pub use crate::core::session::{CancelOutcome, Session, SessionPhase, SessionSnapshot};
pub use crate::core::store::SubscriptionStore;
pub use crate::domain::model::{BillingCycle, NewSubscription, Subscription, SubscriptionId};
pub use crate::utils::error::{Result, TryoutError};
