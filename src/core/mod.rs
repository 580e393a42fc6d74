pub mod aggregator;
pub mod session;
pub mod store;

pub use crate::domain::model::{BillingCycle, NewSubscription, Subscription, SubscriptionId};
pub use crate::domain::ports::{ConfigProvider, SubscriptionProvider};
pub use crate::utils::error::Result;
