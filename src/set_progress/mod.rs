pub mod error;

use crate::model::{Item, SetKey};
use error::SetProgressError;
use std::collections::HashMap;

/// Groups `items` by [`SetKey`], summing amounts per `class_id` and sorting
/// each `SetKey`'s amounts ascending.
///
/// Unlike [`crate::inventory::InventoryModel::group_inventory_sets`], this
/// tolerates an empty input, returning an empty map.
fn group_sets(items: &[Item]) -> HashMap<SetKey, Vec<u64>> {
    let mut by_class: HashMap<SetKey, HashMap<u64, u64>> = HashMap::new();
    for item in items {
        *by_class
            .entry(item.set_key())
            .or_default()
            .entry(item.class_id)
            .or_insert(0) += item.amount as u64;
    }
    by_class
        .into_iter()
        .map(|(key, classes)| {
            let mut amounts: Vec<u64> = classes.into_values().collect();
            amounts.sort_unstable();
            (key, amounts)
        })
        .collect()
}

/// Decides whether applying `give`/`receive` to `inventory` preserves or
/// improves set-completion progress across every `SetKey` the trade
/// touches.
///
/// `inventory` is assumed pre-filtered to the `SetKey`s relevant to the
/// trade (see [`SetKey`] derivation from `give`'s items).
pub struct SetProgressEvaluator;

impl SetProgressEvaluator {
    pub fn is_trade_neutral_or_better(
        inventory: &[Item],
        give: &[Item],
        receive: &[Item],
    ) -> Result<bool, SetProgressError> {
        let initial = group_sets(inventory);

        let mut working: Vec<Item> = inventory.to_vec();
        Self::apply_give(&mut working, give)?;
        working.extend_from_slice(receive);

        let after = group_sets(&working);

        for (set_key, initial_amounts) in &initial {
            let Some(final_amounts) = after.get(set_key) else {
                // Regression: the whole set disappeared.
                return Ok(false);
            };

            if final_amounts.len() < initial_amounts.len() {
                return Ok(false);
            }
            if final_amounts.len() > initial_amounts.len() {
                // Gained a unique class: strictly better, nothing more to check.
                continue;
            }

            let initial_min = initial_amounts[0];
            let final_min = final_amounts[0];
            if final_min < initial_min {
                return Ok(false);
            }
            if final_min > initial_min {
                continue;
            }

            let mut neutrality: i64 = 0;
            for (final_amount, initial_amount) in final_amounts.iter().zip(initial_amounts.iter()) {
                neutrality += *final_amount as i64 - *initial_amount as i64;
                if neutrality < 0 {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Destructively subtracts `give` from `working`, scanning entries by
    /// shared `class_id`; fully consumed entries are dropped, partially
    /// consumed ones are decremented in place.
    fn apply_give(working: &mut Vec<Item>, give: &[Item]) -> Result<(), SetProgressError> {
        for give_item in give {
            let mut remaining = give_item.amount;
            for entry in working.iter_mut() {
                if remaining == 0 {
                    break;
                }
                if entry.class_id != give_item.class_id {
                    continue;
                }
                let take = entry.amount.min(remaining);
                entry.amount -= take;
                remaining -= take;
            }
            working.retain(|entry| entry.amount > 0);

            if remaining > 0 {
                return Err(SetProgressError::InvalidInput {
                    class_id: give_item.class_id,
                    missing: remaining,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemRarity, ItemType};

    fn card(class_id: u64, amount: u32) -> Item {
        Item::new(100, 100, class_id, ItemType::TradingCard, ItemRarity::Common, amount, true, true)
    }

    #[test]
    fn s1_straight_fair_swap_gains_a_unique_class() {
        let inventory = vec![card(1, 2), card(2, 2), card(3, 2)]; // A:2 B:2 C:2
        let give = vec![card(1, 1)]; // A:1
        let receive = vec![card(4, 1)]; // D:1
        assert!(SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn s2_losing_a_class_is_rejected() {
        let inventory = vec![card(1, 1), card(2, 1)]; // A:1 B:1
        let give = vec![card(1, 1)];
        let receive = vec![card(2, 1)];
        assert!(!SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn s3_set_count_regression_is_rejected() {
        let inventory = vec![card(1, 2), card(2, 2), card(3, 2)]; // A:2 B:2 C:2, 2 sets
        let give = vec![card(1, 1), card(2, 1)];
        let receive = vec![card(3, 2)];
        assert!(!SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn s4_set_count_improvement_is_accepted() {
        let inventory = vec![card(1, 3), card(2, 2), card(3, 1)]; // A:3 B:2 C:1, 1 set
        let give = vec![card(1, 1)];
        let receive = vec![card(3, 1)];
        assert!(SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn s5_neutrality_prefix_violation_is_rejected() {
        let inventory = vec![card(1, 1), card(2, 3)]; // A:1 B:3
        let give = vec![card(1, 1)];
        let receive = vec![card(2, 1)];
        assert!(!SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn neutrality_walk_rejects_on_negative_prefix_with_equal_min_and_unique_count() {
        // initial sorted [2, 3, 5]; give 1 off the "3" class, receive 1 onto the "5" class.
        // final sorted [2, 2, 6]: prefix sums are 0, then -1 -> reject.
        let inventory = vec![card(1, 2), card(2, 3), card(3, 5)];
        let give = vec![card(2, 1)];
        let receive = vec![card(3, 1)];
        assert!(!SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn neutrality_walk_accepts_when_every_prefix_is_non_negative() {
        // initial: A:2 B:2 C:5 -> sorted [2, 2, 5], same min and unique count as final,
        // so the early min/unique branches don't short-circuit and the prefix walk runs.
        let inventory = vec![card(1, 2), card(2, 2), card(3, 5)];
        let give = vec![card(3, 1)]; // C: 5 -> 4
        let receive = vec![card(1, 1)]; // A: 2 -> 3
        // final: A:3 B:2 C:4 -> sorted [2, 3, 4]
        // prefix sums vs initial [2, 2, 5]: 0, +1=1, -1=0 -> never negative.
        assert!(SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }

    #[test]
    fn insufficient_inventory_to_give_is_invalid_input() {
        let inventory = vec![card(1, 1)];
        let give = vec![card(1, 5)];
        let receive = vec![card(2, 1)];
        let err = SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap_err();
        assert!(matches!(err, SetProgressError::InvalidInput { class_id: 1, missing: 4 }));
    }

    #[test]
    fn set_keys_new_to_final_are_pure_gains_and_need_no_check() {
        let inventory = vec![card(1, 2), card(2, 2)];
        let give = vec![card(1, 1)];
        let other_set = Item::new(200, 200, 9, ItemType::Emoticon, ItemRarity::Common, 1, true, true);
        let receive = vec![card(2, 1), other_set];
        assert!(SetProgressEvaluator::is_trade_neutral_or_better(&inventory, &give, &receive).unwrap());
    }
}
