use crate::core::aggregator;
use crate::domain::model::{NewSubscription, Subscription, SubscriptionId};

/// Ordered in-memory subscription list. Insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionStore {
    items: Vec<Subscription>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指派新的 id 並附加到最後；不檢查價格或日期
    pub fn add(&mut self, candidate: NewSubscription) -> &Subscription {
        let index = self.items.len();
        self.items
            .push(candidate.into_subscription(SubscriptionId::generate()));
        &self.items[index]
    }

    pub fn remove(&mut self, id: &SubscriptionId) -> Option<Subscription> {
        let position = self.items.iter().position(|s| &s.id == id)?;
        Some(self.items.remove(position))
    }

    pub fn replace_all(&mut self, items: Vec<Subscription>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, id: &SubscriptionId) -> Option<&Subscription> {
        self.items.iter().find(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SubscriptionId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Subscription> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Subscription] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_monthly_cost(&self) -> f64 {
        aggregator::total_monthly_cost(&self.items)
    }
}
