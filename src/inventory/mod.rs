pub mod error;

use crate::model::{Item, SetKey};
use error::InventoryError;
use std::collections::HashMap;

/// `SetKey` -> (`classId` -> summed amount).
pub type InventoryState = HashMap<SetKey, HashMap<u64, u64>>;

/// `SetKey` -> ascending-sorted per-`classId` amounts.
///
/// Sort order is load-bearing: [`crate::set_progress`] compares these
/// sequences index-aligned, and the minimum (first element) is the number
/// of complete sets owned.
pub type InventorySets = HashMap<SetKey, Vec<u64>>;

fn require_non_empty(items: &[Item], name: &'static str) -> Result<(), InventoryError> {
    if items.is_empty() {
        Err(InventoryError::InvalidInput(name))
    } else {
        Ok(())
    }
}

/// Pure derivations over a collection of [`Item`]s.
///
/// Every operation here is a one-pass fold; none mutate their input.
pub struct InventoryModel;

impl InventoryModel {
    /// Sums `amount` into `state[set_key][class_id]`.
    pub fn group_inventory_state(items: &[Item]) -> Result<InventoryState, InventoryError> {
        require_non_empty(items, "items")?;
        Ok(Self::fold_state(items.iter()))
    }

    /// Same grouping as [`Self::group_inventory_state`], then sorts each
    /// `SetKey`'s amounts ascending.
    pub fn group_inventory_sets(items: &[Item]) -> Result<InventorySets, InventoryError> {
        require_non_empty(items, "items")?;
        Ok(Self::state_to_sets(Self::fold_state(items.iter())))
    }

    /// Two simultaneous groupings: the full inventory and the subset of it
    /// that is tradable.
    pub fn group_divided_inventory_state(
        items: &[Item],
    ) -> Result<(InventoryState, InventoryState), InventoryError> {
        require_non_empty(items, "items")?;
        let full = Self::fold_state(items.iter());
        let tradable = Self::fold_state(items.iter().filter(|item| item.tradable));
        Ok((full, tradable))
    }

    /// [`InventoryState`] restricted to `tradable = true` items.
    pub fn select_tradable(items: &[Item]) -> Result<InventoryState, InventoryError> {
        require_non_empty(items, "items")?;
        Ok(Self::fold_state(items.iter().filter(|item| item.tradable)))
    }

    /// Takes tradable items matching a per-`class_id` demand, mutating
    /// owned copies' `amount` down to what is actually taken and decrementing
    /// (or removing) the corresponding `demand` entry.
    pub fn extract_tradable_matching(
        inventory: &[Item],
        demand: &mut HashMap<u64, u32>,
    ) -> Result<Vec<Item>, InventoryError> {
        require_non_empty(inventory, "inventory")?;
        if demand.is_empty() {
            return Err(InventoryError::InvalidInput("classIdCountMap"));
        }

        let mut extracted = Vec::new();
        for item in inventory.iter().filter(|item| item.tradable) {
            let Some(remaining) = demand.get_mut(&item.class_id) else {
                continue;
            };
            if *remaining == 0 {
                continue;
            }

            let taken = item.amount.min(*remaining);
            let mut copy = *item;
            copy.amount = taken;
            extracted.push(copy);

            *remaining -= taken;
            if *remaining == 0 {
                demand.remove(&item.class_id);
            }
        }
        Ok(extracted)
    }

    fn fold_state<'a>(items: impl Iterator<Item = &'a Item>) -> InventoryState {
        let mut state: InventoryState = HashMap::new();
        for item in items {
            *state
                .entry(item.set_key())
                .or_default()
                .entry(item.class_id)
                .or_insert(0) += item.amount as u64;
        }
        state
    }

    fn state_to_sets(state: InventoryState) -> InventorySets {
        state
            .into_iter()
            .map(|(key, classes)| {
                let mut amounts: Vec<u64> = classes.into_values().collect();
                amounts.sort_unstable();
                (key, amounts)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemRarity, ItemType};

    fn card(class_id: u64, amount: u32, tradable: bool) -> Item {
        Item::new(100, 100, class_id, ItemType::TradingCard, ItemRarity::Common, amount, tradable, true)
    }

    #[test]
    fn group_inventory_state_sums_by_class_id() {
        let items = vec![card(1, 2, true), card(1, 1, true), card(2, 5, true)];
        let state = InventoryModel::group_inventory_state(&items).unwrap();
        let key = items[0].set_key();
        assert_eq!(state[&key][&1], 3);
        assert_eq!(state[&key][&2], 5);
    }

    #[test]
    fn group_inventory_sets_is_ascending() {
        let items = vec![card(1, 5, true), card(2, 1, true), card(3, 3, true)];
        let sets = InventoryModel::group_inventory_sets(&items).unwrap();
        let key = items[0].set_key();
        assert_eq!(sets[&key], vec![1, 3, 5]);
    }

    #[test]
    fn group_divided_state_excludes_non_tradable_from_tradable_side() {
        let items = vec![card(1, 2, true), card(2, 4, false)];
        let (full, tradable) = InventoryModel::group_divided_inventory_state(&items).unwrap();
        let key = items[0].set_key();
        assert_eq!(full[&key].len(), 2);
        assert_eq!(tradable[&key].len(), 1);
        assert_eq!(tradable[&key][&1], 2);
    }

    #[test]
    fn extract_tradable_matching_caps_at_demand_and_decrements() {
        let inventory = vec![card(1, 5, true), card(1, 2, true), card(2, 9, true)];
        let mut demand = HashMap::from([(1u64, 6u32)]);

        let extracted = InventoryModel::extract_tradable_matching(&inventory, &mut demand).unwrap();

        let total: u32 = extracted.iter().map(|item| item.amount).sum();
        assert_eq!(total, 6);
        assert!(!demand.contains_key(&1));
    }

    #[test]
    fn extract_tradable_matching_skips_non_tradable() {
        let inventory = vec![card(1, 5, false)];
        let mut demand = HashMap::from([(1u64, 3u32)]);

        let extracted = InventoryModel::extract_tradable_matching(&inventory, &mut demand).unwrap();

        assert!(extracted.is_empty());
        assert_eq!(demand[&1], 3);
    }

    #[test]
    fn empty_input_is_invalid() {
        assert!(matches!(
            InventoryModel::group_inventory_state(&[]),
            Err(InventoryError::InvalidInput(_))
        ));
    }
}
