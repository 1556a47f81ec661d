use crate::config::BotTradeConfig;
use crate::decision::DecisionPolicy;
use crate::external::{Blacklist, InventorySource, KnownBots, Permissions, TradeOfferClient, TradingLock, TwoFactorConfirmer};
use crate::model::{AccountId, ParseTradeResult, TradeOfferId, TradeResult};
use crate::pipeline::handled_offer_set::HandledOfferSet;
use crate::pipeline::OfferPipeline;
use crate::plugin::PluginHook;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::collections::HashSet;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Default cap on the number of offers evaluated concurrently within a
/// single pass.
pub const DEFAULT_MAX_CONCURRENT_OFFERS: usize = 16;

/// Coalescing scheduler: guarantees at most one running pass plus at most
/// one pending pass, and serializes passes against the account's outer
/// trading lock.
pub struct Scheduler<'a> {
    pub self_account: AccountId,
    pub config: &'a BotTradeConfig,
    pub permissions: &'a dyn Permissions,
    pub blacklist: &'a dyn Blacklist,
    pub known_bots: &'a dyn KnownBots,
    pub client: &'a dyn TradeOfferClient,
    pub inventory_source: &'a dyn InventorySource,
    pub two_factor: &'a dyn TwoFactorConfirmer,
    pub trading_lock: &'a dyn TradingLock,
    pub plugin: &'a dyn PluginHook,
    pub handled: &'a HandledOfferSet,
    pub max_concurrent_offers: usize,

    parsing_scheduled: Mutex<bool>,
    trades_semaphore: Semaphore,
}

impl<'a> Scheduler<'a> {
    pub fn new(
        self_account: AccountId,
        config: &'a BotTradeConfig,
        permissions: &'a dyn Permissions,
        blacklist: &'a dyn Blacklist,
        known_bots: &'a dyn KnownBots,
        client: &'a dyn TradeOfferClient,
        inventory_source: &'a dyn InventorySource,
        two_factor: &'a dyn TwoFactorConfirmer,
        trading_lock: &'a dyn TradingLock,
        plugin: &'a dyn PluginHook,
        handled: &'a HandledOfferSet,
    ) -> Self {
        Self {
            self_account,
            config,
            permissions,
            blacklist,
            known_bots,
            client,
            inventory_source,
            two_factor,
            trading_lock,
            plugin,
            handled,
            max_concurrent_offers: DEFAULT_MAX_CONCURRENT_OFFERS,
            parsing_scheduled: Mutex::new(false),
            trades_semaphore: Semaphore::new(1),
        }
    }

    /// Coalescing entry point: call on every inbound event. Returns once a
    /// pass covering this call's trigger has completed, whether this call
    /// started that pass or piggy-backed onto one already running.
    pub async fn on_new_trade(&self) {
        {
            let mut scheduled = self.parsing_scheduled.lock();
            if *scheduled {
                return;
            }
            *scheduled = true;
        }

        let permit = self
            .trades_semaphore
            .acquire()
            .await
            .expect("trades_semaphore is never closed");
        let trading_guard = self.trading_lock.acquire().await;

        // Clearing the flag only once both locks are held is what prevents a
        // fresh OnNewTrade call from observing "not scheduled" while this pass
        // is still in flight and assuming no pass will run on its behalf.
        *self.parsing_scheduled.lock() = false;

        let yielded_lootable = self.parse_active_trades().await;

        drop(trading_guard);
        drop(permit);

        if self.config.send_on_farming_finished && yielded_lootable {
            info!("farming finished: triggering inventory send follow-up");
        }
    }

    /// Runs one full pass: fetch active offers, prune stale handled IDs,
    /// evaluate unhandled offers concurrently, batch mobile confirmations,
    /// and notify the plugin hook.
    async fn parse_active_trades(&self) -> bool {
        let offers = match self.client.get_active_trade_offers().await {
            Ok(offers) if !offers.is_empty() => offers,
            Ok(_) => return false,
            Err(err) => {
                warn!(%err, "failed to fetch active trade offers");
                return false;
            }
        };

        let active_ids: HashSet<TradeOfferId> = offers.iter().map(|offer| offer.trade_offer_id).collect();
        self.handled.intersect_with(&active_ids);

        let policy = DecisionPolicy {
            self_account: self.self_account,
            config: self.config,
            permissions: self.permissions,
            blacklist: self.blacklist,
            known_bots: self.known_bots,
            client: self.client,
            inventory_source: self.inventory_source,
        };
        let pipeline = OfferPipeline {
            policy,
            client: self.client,
            plugin: self.plugin,
            config: self.config,
        };

        let to_evaluate: Vec<_> = offers
            .iter()
            .filter(|offer| !self.handled.contains(offer.trade_offer_id))
            .collect();

        let outcomes: Vec<(Option<ParseTradeResult>, bool)> = stream::iter(to_evaluate)
            .map(|offer| pipeline.parse_trade(offer, self.handled))
            .buffer_unordered(self.max_concurrent_offers.max(1))
            .collect()
            .await;

        if self.two_factor.has_authenticator() {
            let pending: Vec<TradeOfferId> = outcomes
                .iter()
                .filter_map(|(result, needs_confirm)| {
                    result
                        .as_ref()
                        .filter(|r| r.result == TradeResult::Accepted && *needs_confirm)
                        .map(|r| r.trade_offer_id)
                })
                .collect();

            if !pending.is_empty() {
                match self.two_factor.confirm_trades(&pending, true).await {
                    Ok(true) => {}
                    _ => {
                        self.handled.except_with(&pending);
                        return false;
                    }
                }
            }
        }

        let valid: Vec<ParseTradeResult> = outcomes
            .iter()
            .filter_map(|(result, _)| result.clone())
            .collect();
        self.plugin.on_bot_trade_offer_results(&valid);

        outcomes.iter().any(|(result, needs_confirm)| {
            result.as_ref().is_some_and(|r| {
                r.result == TradeResult::Accepted
                    && r.received_item_types
                        .iter()
                        .any(|kind| self.config.lootable_types.contains(kind))
                    && (!*needs_confirm || self.two_factor.has_authenticator())
            })
        })
    }
}
