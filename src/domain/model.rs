use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::utils::error::TryoutError;

/// Opaque subscription identifier. Assigned once, never changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// "per month" / "per year"
    pub fn period_label(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "per month",
            BillingCycle::Yearly => "per year",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = TryoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            other => Err(TryoutError::ValidationError {
                message: format!("Unknown billing cycle '{}': expected monthly or yearly", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: SubscriptionId,
    pub name: String,
    pub provider: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_url: Option<String>,
    #[serde(default)]
    pub can_cancel_programmatically: bool,
}

/// How a subscription can be cancelled from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAction<'a> {
    Programmatic,
    ExternalUrl(&'a str),
    /// Neither programmatic nor linked; user-added records end up here.
    Unavailable,
}

impl Subscription {
    pub fn cancel_action(&self) -> CancelAction<'_> {
        if self.can_cancel_programmatically {
            CancelAction::Programmatic
        } else {
            match self.cancellation_url.as_deref() {
                Some(url) if !url.is_empty() => CancelAction::ExternalUrl(url),
                _ => CancelAction::Unavailable,
            }
        }
    }
}

/// A subscription as submitted by the add form, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub name: String,
    pub provider: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub next_billing_date: String,
}

impl NewSubscription {
    pub fn into_subscription(self, id: SubscriptionId) -> Subscription {
        Subscription {
            id,
            name: self.name,
            provider: self.provider,
            price: self.price,
            currency: self.currency,
            billing_cycle: self.billing_cycle,
            next_billing_date: self.next_billing_date,
            cancellation_url: None,
            can_cancel_programmatically: false,
        }
    }
}
