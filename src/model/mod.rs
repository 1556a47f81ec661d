use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique identifier of a [`TradeOffer`].
///
/// Always non-zero; [`TradeOffer::new`] rejects zero values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct TradeOfferId(pub u64);

impl std::fmt::Display for TradeOfferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TradeOfferId({})", self.0)
    }
}

/// Identifier of a trading-service account.
///
/// `0` is reserved to mean "the trading service itself", e.g. a system-issued
/// gift rather than a counterparty-initiated offer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub struct AccountId(pub u64);

impl AccountId {
    pub const SYSTEM: Self = Self(0);

    pub fn is_system(&self) -> bool {
        *self == Self::SYSTEM
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

/// Coarse classification of an [`Item`], mirroring a real item's trading
/// surface (cards are set members, the rest are not).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum ItemType {
    TradingCard,
    FoilTradingCard,
    Emoticon,
    Background,
    SaleItem,
    Gems,
    Other,
}

/// Ordinal rarity tier of an [`Item`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
}

/// Composite grouping key: items sharing a `SetKey` belong to the same
/// "set" and are interchangeable for set-completion purposes.
///
/// Equality and hashing are `#[derive]`d over all three fields.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor)]
pub struct SetKey {
    pub real_app_id: u32,
    pub kind: ItemType,
    pub rarity: ItemRarity,
}

/// A single stack of fungible in-game objects.
///
/// Plain value type: every field is `Copy`, so simulating a trade is just
/// taking owned copies and mutating `amount` on them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct Item {
    pub app_id: u32,
    pub real_app_id: u32,
    pub class_id: u64,
    pub kind: ItemType,
    pub rarity: ItemRarity,
    pub amount: u32,
    pub tradable: bool,
    pub marketable: bool,
}

impl Item {
    pub fn set_key(&self) -> SetKey {
        SetKey::new(self.real_app_id, self.kind, self.rarity)
    }
}

/// Lifecycle state of a [`TradeOffer`] as reported by the trading service.
///
/// Only [`TradeOfferState::Active`] offers are eligible for evaluation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum TradeOfferState {
    Active,
    Accepted,
    Declined,
    Canceled,
    Expired,
    InvalidItems,
    CounteredByOtherParty,
}

/// A two-sided proposal: items we would give against items we would receive.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct TradeOffer {
    pub trade_offer_id: TradeOfferId,
    pub other_account_id: AccountId,
    pub state: TradeOfferState,
    pub items_to_give: Vec<Item>,
    pub items_to_receive: Vec<Item>,
}

impl TradeOffer {
    /// Constructs a [`TradeOffer`]. Panics if `trade_offer_id` is zero.
    pub fn new(
        trade_offer_id: TradeOfferId,
        other_account_id: AccountId,
        state: TradeOfferState,
        items_to_give: Vec<Item>,
        items_to_receive: Vec<Item>,
    ) -> Self {
        assert_ne!(trade_offer_id.0, 0, "TradeOfferId must be non-zero");
        Self {
            trade_offer_id,
            other_account_id,
            state,
            items_to_give,
            items_to_receive,
        }
    }

    pub fn wanted_sets(&self) -> HashSet<SetKey> {
        self.items_to_give.iter().map(Item::set_key).collect()
    }
}

/// Outcome of evaluating and acting on a single [`TradeOffer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub enum TradeResult {
    Accepted,
    Blacklisted,
    Ignored,
    Rejected,
    TryAgain,
}

/// Final, immutable record of how an offer was resolved.
///
/// Only ever constructed with a non-zero `trade_offer_id`.
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct ParseTradeResult {
    pub trade_offer_id: TradeOfferId,
    pub result: TradeResult,
    pub received_item_types: HashSet<ItemType>,
}

impl ParseTradeResult {
    pub fn new(
        trade_offer_id: TradeOfferId,
        result: TradeResult,
        received_item_types: HashSet<ItemType>,
    ) -> Self {
        assert_ne!(trade_offer_id.0, 0, "TradeOfferId must be non-zero");
        Self {
            trade_offer_id,
            result,
            received_item_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_groups_by_all_three_fields() {
        let a = Item::new(100, 100, 1, ItemType::TradingCard, ItemRarity::Common, 2, true, true);
        let b = Item::new(100, 100, 2, ItemType::TradingCard, ItemRarity::Common, 3, true, true);
        let c = Item::new(100, 100, 3, ItemType::FoilTradingCard, ItemRarity::Common, 1, true, true);

        assert_eq!(a.set_key(), b.set_key());
        assert_ne!(a.set_key(), c.set_key());
    }

    #[test]
    #[should_panic]
    fn trade_offer_rejects_zero_id() {
        TradeOffer::new(
            TradeOfferId(0),
            AccountId(1),
            TradeOfferState::Active,
            vec![],
            vec![],
        );
    }
}
