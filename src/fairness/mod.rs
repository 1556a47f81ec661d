pub mod error;

use crate::model::{Item, SetKey};
use error::FairnessError;
use std::collections::HashMap;

fn totals_by_set_key(items: &[Item]) -> HashMap<SetKey, u64> {
    let mut totals = HashMap::new();
    for item in items {
        *totals.entry(item.set_key()).or_insert(0u64) += item.amount as u64;
    }
    totals
}

/// Predicate over a proposed exchange: count-wise fair per item class.
///
/// A trade is fair iff, for every `SetKey` present on the `give` side, that
/// `SetKey` also appears on the `receive` side with at least as much total
/// amount. `SetKey`s present only on `receive` are always acceptable.
pub struct FairnessEvaluator;

impl FairnessEvaluator {
    pub fn is_fair_exchange(give: &[Item], receive: &[Item]) -> Result<bool, FairnessError> {
        if give.is_empty() {
            return Err(FairnessError::InvalidInput("give"));
        }
        if receive.is_empty() {
            return Err(FairnessError::InvalidInput("receive"));
        }

        let give_totals = totals_by_set_key(give);
        let receive_totals = totals_by_set_key(receive);

        Ok(give_totals.iter().all(|(set_key, given)| {
            receive_totals
                .get(set_key)
                .is_some_and(|received| given <= received)
        }))
    }
}
