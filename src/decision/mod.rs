use crate::config::BotTradeConfig;
use crate::external::{Blacklist, InventorySource, KnownBots, Permissions, TradeOfferClient};
use crate::fairness::FairnessEvaluator;
use crate::model::{AccountId, TradeOffer, TradeResult};
use crate::set_progress::SetProgressEvaluator;
use tracing::{debug, warn};

/// Ordered cascade deciding whether to accept a two-sided or donation trade.
///
/// Cheap, local pre-checks (counts, flags) run before any collaborator is
/// called; the network-bound checks (trade hold, inventory) only run once
/// every cheaper check has passed, per spec.
pub struct DecisionPolicy<'a> {
    pub self_account: AccountId,
    pub config: &'a BotTradeConfig,
    pub permissions: &'a dyn Permissions,
    pub blacklist: &'a dyn Blacklist,
    pub known_bots: &'a dyn KnownBots,
    pub client: &'a dyn TradeOfferClient,
    pub inventory_source: &'a dyn InventorySource,
}

impl<'a> DecisionPolicy<'a> {
    pub async fn should_accept_trade(&self, offer: &TradeOffer) -> TradeResult {
        let other = offer.other_account_id;

        if self.permissions.has_master_permission(other) {
            return TradeResult::Accepted;
        }

        if self.blacklist.is_blacklisted(other) {
            return TradeResult::Blacklisted;
        }

        if offer.items_to_give.is_empty() && offer.items_to_receive.is_empty() {
            return TradeResult::TryAgain;
        }

        if offer.items_to_give.is_empty() {
            return self.decide_donation(other);
        }

        if !self.config.steam_trade_matcher {
            return TradeResult::Rejected;
        }

        if offer.items_to_give.len() > offer.items_to_receive.len() {
            return TradeResult::Rejected;
        }

        if self.has_disallowed_item_types(offer) {
            return TradeResult::Rejected;
        }

        match FairnessEvaluator::is_fair_exchange(&offer.items_to_give, &offer.items_to_receive) {
            Ok(true) => {}
            Ok(false) => return TradeResult::Rejected,
            Err(err) => {
                warn!(%err, "IsFairExchange rejected a non-empty offer's input as invalid");
                return TradeResult::TryAgain;
            }
        }

        match self
            .client
            .get_trade_hold_duration(other, offer.trade_offer_id)
            .await
        {
            Ok(None) => return TradeResult::TryAgain,
            Ok(Some(hold)) => {
                if hold > self.config.max_trade_hold_duration {
                    return TradeResult::Rejected;
                }
                if hold > 0 && self.gives_short_lived_sale_card(offer) {
                    return TradeResult::Rejected;
                }
            }
            Err(err) => {
                debug!(%err, "trade hold lookup failed");
                return TradeResult::TryAgain;
            }
        }

        if self.config.match_everything {
            return TradeResult::Accepted;
        }

        let wanted_sets = offer.wanted_sets();
        let inventory = match self.inventory_source.inventory(self.self_account, &wanted_sets).await {
            Ok(items) if !items.is_empty() => items,
            Ok(_) => return TradeResult::TryAgain,
            Err(err) => {
                debug!(%err, "own inventory fetch failed");
                return TradeResult::TryAgain;
            }
        };

        match SetProgressEvaluator::is_trade_neutral_or_better(
            &inventory,
            &offer.items_to_give,
            &offer.items_to_receive,
        ) {
            Ok(true) => TradeResult::Accepted,
            Ok(false) => TradeResult::Rejected,
            Err(err) => {
                warn!(%err, "IsTradeNeutralOrBetter found an inventory/offer mismatch");
                TradeResult::TryAgain
            }
        }
    }

    fn decide_donation(&self, other: AccountId) -> TradeResult {
        let accept_donations = self.config.accept_donations;
        let accept_bot_trades = !self.config.dont_accept_bot_trades;
        let is_bot_trade = self.known_bots.is_own_bot(other);

        if accept_donations && accept_bot_trades {
            return TradeResult::Accepted;
        }
        if !accept_donations && !accept_bot_trades {
            return TradeResult::Rejected;
        }

        let accepted = (accept_donations && !is_bot_trade) || (accept_bot_trades && is_bot_trade);
        if accepted {
            TradeResult::Accepted
        } else {
            TradeResult::Rejected
        }
    }

    fn has_disallowed_item_types(&self, offer: &TradeOffer) -> bool {
        offer
            .items_to_give
            .iter()
            .chain(offer.items_to_receive.iter())
            .any(|item| !self.config.matchable_types.contains(&item.kind))
    }

    fn gives_short_lived_sale_card(&self, offer: &TradeOffer) -> bool {
        offer.items_to_give.iter().any(|item| {
            item.kind == crate::model::ItemType::TradingCard
                && self.config.short_lived_sale_apps.contains(&item.real_app_id)
        })
    }
}
