use crate::core::{BillingCycle, NewSubscription, Result};
use crate::utils::error::TryoutError;
use crate::utils::validation::{validate_non_empty_string, Validate};
use chrono::NaiveDate;

pub const SUPPORTED_CURRENCIES: [&str; 3] = ["USD", "EUR", "GBP"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw add-subscription input, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AddSubscriptionForm {
    pub name: String,
    pub provider: String,
    pub price: String,
    pub currency: String,
    pub billing_cycle: String,
    pub next_billing_date: String,
}

impl Default for AddSubscriptionForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            price: String::new(),
            currency: "USD".to_string(),
            billing_cycle: BillingCycle::Monthly.as_str().to_string(),
            next_billing_date: String::new(),
        }
    }
}

impl AddSubscriptionForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn parse_price(&self) -> Result<f64> {
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| TryoutError::ValidationError {
                message: format!("Price '{}' is not a number", self.price),
            })?;
        if !price.is_finite() || price < 0.0 {
            return Err(TryoutError::ValidationError {
                message: format!("Price must be a non-negative amount, got {}", self.price),
            });
        }
        Ok(price)
    }

    fn parse_currency(&self) -> Result<String> {
        let currency = self.currency.trim().to_ascii_uppercase();
        if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
            return Err(TryoutError::ValidationError {
                message: format!(
                    "Unsupported currency '{}'. Choose one of: {}",
                    self.currency,
                    SUPPORTED_CURRENCIES.join(", ")
                ),
            });
        }
        Ok(currency)
    }

    fn parse_date(&self) -> Result<String> {
        let raw = self.next_billing_date.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| TryoutError::ValidationError {
            message: format!("Next billing date '{}' must look like 2024-04-15", raw),
        })?;
        Ok(raw.to_string())
    }

    /// Validates the input and converts it into a store candidate.
    pub fn into_new_subscription(self) -> Result<NewSubscription> {
        self.validate()?;
        Ok(NewSubscription {
            price: self.parse_price()?,
            currency: self.parse_currency()?,
            billing_cycle: self.billing_cycle.parse()?,
            next_billing_date: self.parse_date()?,
            name: self.name.trim().to_string(),
            provider: self.provider.trim().to_string(),
        })
    }
}

impl Validate for AddSubscriptionForm {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("Service name", &self.name)?;
        validate_non_empty_string("Provider", &self.provider)?;
        validate_non_empty_string("Price", &self.price)?;
        validate_non_empty_string("Next billing date", &self.next_billing_date)?;
        self.parse_price()?;
        self.parse_currency()?;
        self.billing_cycle.parse::<BillingCycle>()?;
        self.parse_date()?;
        Ok(())
    }
}
