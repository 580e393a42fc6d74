use crate::domain::model::{Subscription, SubscriptionId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Backend that knows which subscriptions an account has and how to end them.
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    async fn discover_subscriptions(&self, email: &str) -> Result<Vec<Subscription>>;
    async fn cancel_subscription(&self, id: &SubscriptionId) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn discovery_delay(&self) -> Duration;
    fn cancellation_delay(&self) -> Duration;
    fn fail_discovery(&self) -> bool;
    fn fail_cancellation(&self) -> bool;
    /// `None` means the built-in seed list.
    fn seed_subscriptions(&self) -> Option<&[Subscription]>;
}
