use crate::app::forms::DATE_FORMAT;
use crate::core::aggregator::CostSummary;
use crate::core::session::{SessionPhase, SessionSnapshot};
use crate::domain::model::{CancelAction, Subscription};
use chrono::NaiveDate;
use std::fmt::Write;

pub fn render_summary(summary: &CostSummary) -> String {
    format!(
        "Total Subscriptions: {}\nMonthly Cost: {}",
        summary.total_subscriptions,
        summary.formatted_cost()
    )
}

/// "Apr 15, 2024"; anything unparsable is shown as-is.
pub fn display_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn render_cancel_action(subscription: &Subscription) -> String {
    match subscription.cancel_action() {
        CancelAction::Programmatic => format!("cancel with `cancel {}`", subscription.id),
        CancelAction::ExternalUrl(url) => format!("cancellation instructions: {}", url),
        CancelAction::Unavailable => "no cancellation method available".to_string(),
    }
}

/// One list entry, numbered from 1.
pub fn render_subscription(index: usize, subscription: &Subscription) -> String {
    format!(
        "{}. {} ({})\n   {} {} {}\n   Next billing: {}\n   {}",
        index + 1,
        subscription.name,
        subscription.provider,
        subscription.price,
        subscription.currency,
        subscription.billing_cycle.period_label(),
        display_date(&subscription.next_billing_date),
        render_cancel_action(subscription)
    )
}

pub fn render_list(subscriptions: &[Subscription]) -> String {
    if subscriptions.is_empty() {
        return "No subscriptions yet. Add one with `add`.".to_string();
    }
    subscriptions
        .iter()
        .enumerate()
        .map(|(i, s)| render_subscription(i, s))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_session(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    match snapshot.phase {
        SessionPhase::LoggedOut => {
            out.push_str("Discover Your Subscriptions: log in with `login <email>`");
        }
        SessionPhase::Discovering => out.push_str("Discovering subscriptions..."),
        SessionPhase::LoggedIn => {
            let _ = writeln!(
                out,
                "Your Subscriptions ({})",
                snapshot.email.as_deref().unwrap_or_default()
            );
            let _ = writeln!(out, "{}", render_summary(&snapshot.summary));
            out.push('\n');
            out.push_str(&render_list(&snapshot.subscriptions));
        }
    }
    if let Some(error) = &snapshot.last_error {
        let _ = write!(out, "\n⚠️  {}", error);
    }
    out
}
