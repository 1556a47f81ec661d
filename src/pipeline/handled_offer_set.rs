use crate::model::TradeOfferId;
use parking_lot::Mutex;
use std::collections::HashSet;

/// Process-lifetime set of offer IDs already decided in this session.
#[derive(Default)]
pub struct HandledOfferSet {
    inner: Mutex<HashSet<TradeOfferId>>,
}

impl HandledOfferSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id`, returning `true` if it was not already present.
    pub fn add(&self, id: TradeOfferId) -> bool {
        self.inner.lock().insert(id)
    }

    pub fn remove(&self, id: TradeOfferId) -> bool {
        self.inner.lock().remove(&id)
    }

    pub fn contains(&self, id: TradeOfferId) -> bool {
        self.inner.lock().contains(&id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Retains only the IDs also present in `active`.
    pub fn intersect_with(&self, active: &HashSet<TradeOfferId>) {
        self.inner.lock().retain(|id| active.contains(id));
    }

    /// Removes every ID in `ids` from the set.
    pub fn except_with(&self, ids: &[TradeOfferId]) {
        let mut inner = self.inner.lock();
        for id in ids {
            inner.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
