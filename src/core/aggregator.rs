use crate::domain::model::{BillingCycle, Subscription};
use serde::Serialize;

/// Dashboard figures: how many subscriptions and what they cost per month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_subscriptions: usize,
    pub monthly_cost: f64,
}

impl CostSummary {
    pub fn formatted_cost(&self) -> String {
        format_cost(self.monthly_cost)
    }
}

pub fn monthly_equivalent(subscription: &Subscription) -> f64 {
    match subscription.billing_cycle {
        BillingCycle::Yearly => subscription.price / 12.0,
        BillingCycle::Monthly => subscription.price,
    }
}

/// 不做匯率換算：不同幣別直接相加
pub fn total_monthly_cost<'a, I>(subscriptions: I) -> f64
where
    I: IntoIterator<Item = &'a Subscription>,
{
    subscriptions.into_iter().map(monthly_equivalent).sum()
}

pub fn summarize(subscriptions: &[Subscription]) -> CostSummary {
    CostSummary {
        total_subscriptions: subscriptions.len(),
        monthly_cost: total_monthly_cost(subscriptions),
    }
}

pub fn format_cost(total: f64) -> String {
    format!("${:.2}", total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SubscriptionId;

    fn sub(price: f64, billing_cycle: BillingCycle) -> Subscription {
        Subscription {
            id: SubscriptionId::generate(),
            name: "Service".to_string(),
            provider: "Provider".to_string(),
            price,
            currency: "USD".to_string(),
            billing_cycle,
            next_billing_date: "2024-04-01".to_string(),
            cancellation_url: None,
            can_cancel_programmatically: false,
        }
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(total_monthly_cost(std::iter::empty()), 0.0);
        assert_eq!(summarize(&[]), CostSummary::default());
        assert_eq!(format_cost(0.0), "$0.00");
    }

    #[test]
    fn test_seeded_pair_totals_17_98() {
        let subs = vec![
            sub(15.99, BillingCycle::Monthly),
            sub(1.99, BillingCycle::Monthly),
        ];
        let summary = summarize(&subs);
        assert_eq!(summary.total_subscriptions, 2);
        assert!((summary.monthly_cost - 17.98).abs() < 1e-9);
        assert_eq!(summary.formatted_cost(), "$17.98");
    }

    #[test]
    fn test_yearly_is_divided_by_twelve() {
        let subs = vec![sub(12.0, BillingCycle::Yearly)];
        assert_eq!(total_monthly_cost(&subs), 1.0);
        assert_eq!(format_cost(total_monthly_cost(&subs)), "$1.00");
    }

    #[test]
    fn test_mixed_cycles_and_currencies_sum_raw() {
        let mut eur = sub(120.0, BillingCycle::Yearly);
        eur.currency = "EUR".to_string();
        let subs = vec![sub(5.0, BillingCycle::Monthly), eur];

        let expected: f64 = subs
            .iter()
            .map(|s| match s.billing_cycle {
                BillingCycle::Yearly => s.price / 12.0,
                BillingCycle::Monthly => s.price,
            })
            .sum();
        assert_eq!(total_monthly_cost(&subs), expected);
        assert_eq!(format_cost(total_monthly_cost(&subs)), "$15.00");
    }
}
