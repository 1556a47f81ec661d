pub mod handled_offer_set;

use crate::config::BotTradeConfig;
use crate::decision::DecisionPolicy;
use crate::external::TradeOfferClient;
use crate::model::{ParseTradeResult, TradeOffer, TradeOfferState, TradeResult};
use crate::plugin::PluginHook;
use handled_offer_set::HandledOfferSet;
use std::collections::HashSet;
use tracing::{debug, info, warn};

fn sum_amount(items: &[crate::model::Item]) -> u64 {
    items.iter().map(|item| item.amount as u64).sum()
}

/// Per-offer dedup-decide-act-record pipeline.
///
/// At most one side effect per offer ID for the lifetime of a
/// [`HandledOfferSet`].
pub struct OfferPipeline<'a> {
    pub policy: DecisionPolicy<'a>,
    pub client: &'a dyn TradeOfferClient,
    pub plugin: &'a dyn PluginHook,
    pub config: &'a BotTradeConfig,
}

impl<'a> OfferPipeline<'a> {
    /// Returns the final record of how `offer` was resolved (`None` if it
    /// was not eligible for evaluation at all) and whether the accept, if
    /// any, still requires a mobile/app confirmation.
    pub async fn parse_trade(
        &self,
        offer: &TradeOffer,
        handled: &HandledOfferSet,
    ) -> (Option<ParseTradeResult>, bool) {
        if offer.state != TradeOfferState::Active {
            debug!(trade_offer_id = %offer.trade_offer_id, state = ?offer.state, "skipping non-active offer");
            return (None, false);
        }

        if !handled.add(offer.trade_offer_id) {
            debug!(trade_offer_id = %offer.trade_offer_id, "offer already handled this session");
            return (
                Some(ParseTradeResult::new(offer.trade_offer_id, TradeResult::Ignored, HashSet::new())),
                false,
            );
        }

        let pre_upgrade_result = self.policy.should_accept_trade(offer).await;
        let mut result = pre_upgrade_result;

        if matches!(result, TradeResult::Rejected) && self.plugin.on_bot_trade_offer(offer) {
            debug!(
                trade_offer_id = %offer.trade_offer_id,
                pre_upgrade = ?pre_upgrade_result,
                "plugin hook upgraded a rejected offer to accepted"
            );
            result = TradeResult::Accepted;
        }

        let needs_mobile_confirm = self.act_on(offer, &mut result).await;

        // An offer decided TryAgain must not stay in HandledOfferSet, whichever
        // branch above produced it, so a future pass can retry it.
        if matches!(result, TradeResult::TryAgain) {
            handled.remove(offer.trade_offer_id);
        }

        match result {
            TradeResult::Accepted => info!(trade_offer_id = %offer.trade_offer_id, "accepted"),
            TradeResult::Blacklisted => info!(trade_offer_id = %offer.trade_offer_id, "declined blacklisted counterparty"),
            TradeResult::Rejected => debug!(trade_offer_id = %offer.trade_offer_id, "rejected"),
            TradeResult::Ignored => debug!(trade_offer_id = %offer.trade_offer_id, "ignored"),
            TradeResult::TryAgain => warn!(trade_offer_id = %offer.trade_offer_id, "will retry next pass"),
        }

        let received_item_types = offer.items_to_receive.iter().map(|item| item.kind).collect();
        (
            Some(ParseTradeResult::new(offer.trade_offer_id, result, received_item_types)),
            needs_mobile_confirm,
        )
    }

    /// Performs the accept/decline side effect implied by `result`,
    /// downgrading `result` in place to `TryAgain` if the network call
    /// itself fails. Returns whether a mobile confirmation is pending.
    async fn act_on(&self, offer: &TradeOffer, result: &mut TradeResult) -> bool {
        match *result {
            TradeResult::Accepted => match self.client.accept_trade_offer(offer.trade_offer_id).await {
                Ok(outcome) if outcome.success => {
                    if sum_amount(&offer.items_to_receive) > sum_amount(&offer.items_to_give) {
                        info!(trade_offer_id = %offer.trade_offer_id, "accepted offer is a net donation to us");
                    }
                    outcome.requires_confirmation
                }
                _ => {
                    *result = TradeResult::TryAgain;
                    false
                }
            },
            TradeResult::Blacklisted => {
                if !matches!(self.client.decline_trade_offer(offer.trade_offer_id).await, Ok(true)) {
                    *result = TradeResult::TryAgain;
                }
                false
            }
            TradeResult::Rejected if self.config.reject_invalid_trades => {
                if !matches!(self.client.decline_trade_offer(offer.trade_offer_id).await, Ok(true)) {
                    *result = TradeResult::TryAgain;
                }
                false
            }
            TradeResult::Rejected | TradeResult::Ignored | TradeResult::TryAgain => false,
        }
    }
}
