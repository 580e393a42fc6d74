use crate::app::providers::simulated::{DEFAULT_CANCELLATION_DELAY, DEFAULT_DISCOVERY_DELAY};
use crate::core::{ConfigProvider, Subscription};
use crate::utils::error::{Result, TryoutError};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "cli")]
use crate::config::cli::{CliConfig, LogFormat};
use crate::config::MAX_DELAY_MS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub app: Option<AppInfo>,
    pub discovery: Option<DiscoveryConfig>,
    pub cancellation: Option<CancellationConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub delay_ms: Option<u64>,
    pub fail: Option<bool>,
    /// 取代內建的兩筆示範訂閱
    pub subscriptions: Option<Vec<Subscription>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancellationConfig {
    pub delay_ms: Option<u64>,
    pub fail: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub verbose: Option<bool>,
    /// "compact" or "json"
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TryoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TryoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DISCOVERY_DELAY_MS})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TryoutError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(app) = &self.app {
            validate_non_empty_string("app.name", &app.name)?;
        }

        if let Some(ms) = self.discovery.as_ref().and_then(|d| d.delay_ms) {
            validate_range("discovery.delay_ms", ms, 0, MAX_DELAY_MS)?;
        }
        if let Some(ms) = self.cancellation.as_ref().and_then(|c| c.delay_ms) {
            validate_range("cancellation.delay_ms", ms, 0, MAX_DELAY_MS)?;
        }

        if let Some(seed) = self.seed_subscriptions() {
            let mut seen = HashSet::new();
            for sub in seed {
                if sub.id.as_str().trim().is_empty() {
                    return Err(TryoutError::MissingConfigError {
                        field: "discovery.subscriptions.id".to_string(),
                    });
                }
                if !seen.insert(sub.id.as_str()) {
                    return Err(TryoutError::InvalidConfigValueError {
                        field: "discovery.subscriptions.id".to_string(),
                        value: sub.id.to_string(),
                        reason: "Duplicate subscription id".to_string(),
                    });
                }
                if !sub.price.is_finite() || sub.price < 0.0 {
                    return Err(TryoutError::InvalidConfigValueError {
                        field: "discovery.subscriptions.price".to_string(),
                        value: sub.price.to_string(),
                        reason: "Price must be a non-negative amount".to_string(),
                    });
                }
                if let Some(url) = &sub.cancellation_url {
                    validate_url("discovery.subscriptions.cancellationUrl", url)?;
                }
            }
        }

        if let Some(format) = self.monitoring.as_ref().and_then(|m| m.log_format.as_deref()) {
            if !["compact", "json"].contains(&format) {
                return Err(TryoutError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn app_name(&self) -> &str {
        self.app.as_ref().map(|a| a.name.as_str()).unwrap_or("TryOut")
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            == Some("json")
    }

    /// 命令列參數優先於設定檔
    #[cfg(feature = "cli")]
    pub fn apply_overrides(&mut self, cli: &CliConfig) {
        if let Some(ms) = cli.discovery_delay_ms {
            self.discovery.get_or_insert_with(Default::default).delay_ms = Some(ms);
        }
        if cli.fail_discovery {
            self.discovery.get_or_insert_with(Default::default).fail = Some(true);
        }
        if let Some(ms) = cli.cancellation_delay_ms {
            self.cancellation.get_or_insert_with(Default::default).delay_ms = Some(ms);
        }
        if cli.fail_cancellation {
            self.cancellation.get_or_insert_with(Default::default).fail = Some(true);
        }
        if cli.verbose {
            self.monitoring.get_or_insert_with(Default::default).verbose = Some(true);
        }
        if cli.log_format == LogFormat::Json {
            self.monitoring.get_or_insert_with(Default::default).log_format =
                Some("json".to_string());
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn discovery_delay(&self) -> Duration {
        self.discovery
            .as_ref()
            .and_then(|d| d.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DISCOVERY_DELAY)
    }

    fn cancellation_delay(&self) -> Duration {
        self.cancellation
            .as_ref()
            .and_then(|c| c.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CANCELLATION_DELAY)
    }

    fn fail_discovery(&self) -> bool {
        self.discovery.as_ref().and_then(|d| d.fail).unwrap_or(false)
    }

    fn fail_cancellation(&self) -> bool {
        self.cancellation
            .as_ref()
            .and_then(|c| c.fail)
            .unwrap_or(false)
    }

    fn seed_subscriptions(&self) -> Option<&[Subscription]> {
        self.discovery
            .as_ref()
            .and_then(|d| d.subscriptions.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
