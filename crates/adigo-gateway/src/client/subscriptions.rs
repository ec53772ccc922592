//! Destination to subscription-id table
//!
//! Ids are assigned once per destination and survive reconnects; after each
//! CONNECTED every entry is sent again.

use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub(crate) struct SubscriptionTable {
    by_destination: BTreeMap<String, String>,
}

impl SubscriptionTable {
    /// Id for `destination`, and whether it was just created
    pub(crate) fn register(&mut self, destination: &str) -> (String, bool) {
        if let Some(id) = self.by_destination.get(destination) {
            return (id.clone(), false);
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.by_destination
            .insert(destination.to_string(), id.clone());
        (id, true)
    }

    pub(crate) fn remove(&mut self, destination: &str) -> Option<String> {
        self.by_destination.remove(destination)
    }

    pub(crate) fn contains(&self, destination: &str) -> bool {
        self.by_destination.contains_key(destination)
    }

    /// `(destination, id)` pairs
    pub(crate) fn entries(&self) -> Vec<(String, String)> {
        self.by_destination
            .iter()
            .map(|(d, id)| (d.clone(), id.clone()))
            .collect()
    }
}
