use crate::core::{
    BillingCycle, ConfigProvider, Result, Subscription, SubscriptionId, SubscriptionProvider,
};
use crate::utils::error::TryoutError;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_DISCOVERY_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_CANCELLATION_DELAY: Duration = Duration::from_millis(1000);

/// The two accounts every demo login discovers.
pub fn default_seed() -> Vec<Subscription> {
    vec![
        Subscription {
            id: SubscriptionId::new("1"),
            name: "Netflix".to_string(),
            provider: "Netflix, Inc.".to_string(),
            price: 15.99,
            currency: "USD".to_string(),
            billing_cycle: BillingCycle::Monthly,
            next_billing_date: "2024-04-15".to_string(),
            cancellation_url: Some("https://netflix.com/cancel".to_string()),
            can_cancel_programmatically: false,
        },
        Subscription {
            id: SubscriptionId::new("2"),
            name: "Google One".to_string(),
            provider: "Google LLC".to_string(),
            price: 1.99,
            currency: "USD".to_string(),
            billing_cycle: BillingCycle::Monthly,
            next_billing_date: "2024-04-01".to_string(),
            cancellation_url: None,
            can_cancel_programmatically: true,
        },
    ]
}

/// Stand-in backend: fixed delays, canned discovery results, optional failures.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    discovery_delay: Duration,
    cancellation_delay: Duration,
    fail_discovery: bool,
    fail_cancellation: bool,
    seed: Vec<Subscription>,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self {
            discovery_delay: DEFAULT_DISCOVERY_DELAY,
            cancellation_delay: DEFAULT_CANCELLATION_DELAY,
            fail_discovery: false,
            fail_cancellation: false,
            seed: default_seed(),
        }
    }
}

impl SimulatedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            discovery_delay: config.discovery_delay(),
            cancellation_delay: config.cancellation_delay(),
            fail_discovery: config.fail_discovery(),
            fail_cancellation: config.fail_cancellation(),
            seed: config
                .seed_subscriptions()
                .map(<[Subscription]>::to_vec)
                .unwrap_or_else(default_seed),
        }
    }

    /// 測試用：不等待
    pub fn instant() -> Self {
        Self::default().with_delays(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_delays(mut self, discovery: Duration, cancellation: Duration) -> Self {
        self.discovery_delay = discovery;
        self.cancellation_delay = cancellation;
        self
    }

    pub fn with_failures(mut self, discovery: bool, cancellation: bool) -> Self {
        self.fail_discovery = discovery;
        self.fail_cancellation = cancellation;
        self
    }

    pub fn with_seed(mut self, seed: Vec<Subscription>) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> &[Subscription] {
        &self.seed
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl SubscriptionProvider for SimulatedProvider {
    async fn discover_subscriptions(&self, email: &str) -> Result<Vec<Subscription>> {
        tracing::debug!(
            "Simulating discovery for {} ({:?} delay)",
            email,
            self.discovery_delay
        );
        Self::pause(self.discovery_delay).await;

        if self.fail_discovery {
            return Err(TryoutError::ProviderError {
                message: format!("simulated discovery failure for {}", email),
            });
        }
        Ok(self.seed.clone())
    }

    async fn cancel_subscription(&self, id: &SubscriptionId) -> Result<()> {
        tracing::debug!(
            "Simulating cancellation of {} ({:?} delay)",
            id,
            self.cancellation_delay
        );
        Self::pause(self.cancellation_delay).await;

        if self.fail_cancellation {
            return Err(TryoutError::ProviderError {
                message: format!("simulated cancellation failure for {}", id),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::total_monthly_cost;
    use std::time::Instant;

    #[tokio::test]
    async fn test_discovery_returns_seed() {
        let provider = SimulatedProvider::instant();
        let found = provider
            .discover_subscriptions("user@example.com")
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Netflix");
        assert_eq!(
            found[0].cancellation_url.as_deref(),
            Some("https://netflix.com/cancel")
        );
        assert!(!found[0].can_cancel_programmatically);
        assert_eq!(found[1].name, "Google One");
        assert!(found[1].can_cancel_programmatically);
        assert!((total_monthly_cost(&found) - 17.98).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_failures_are_reported() {
        let provider = SimulatedProvider::instant().with_failures(true, true);
        assert!(provider.discover_subscriptions("a@b.c").await.is_err());
        assert!(provider
            .cancel_subscription(&SubscriptionId::new("2"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let provider = SimulatedProvider::instant()
            .with_delays(Duration::from_millis(20), Duration::from_millis(20));
        let started = Instant::now();
        provider
            .cancel_subscription(&SubscriptionId::new("2"))
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_default_delays() {
        let provider = SimulatedProvider::new();
        assert_eq!(provider.discovery_delay, Duration::from_millis(1500));
        assert_eq!(provider.cancellation_delay, Duration::from_millis(1000));
    }
}
