use crate::model::ItemType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Platform-imposed limits, used only for capacity planning. Not enforced
/// as a hard reject inside the decision cascade.
pub const MAX_ITEMS_PER_TRADE: usize = 255;
pub const MAX_TRADES_PER_ACCOUNT: usize = 5;

/// Per-bot configuration flags consulted by [`crate::decision::DecisionPolicy`]
/// and [`crate::scheduler::Scheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BotTradeConfig {
    /// Accept one-sided incoming trades from non-bot counterparties.
    pub accept_donations: bool,

    /// Invert donation acceptance for counterparties that are other own bots.
    pub dont_accept_bot_trades: bool,

    /// Enable neutral-or-better evaluation for two-sided trades at all.
    pub steam_trade_matcher: bool,

    /// Skip the neutral-or-better check and accept any fair trade.
    pub match_everything: bool,

    /// Decline (instead of ignore) offers the cascade rejects.
    pub reject_invalid_trades: bool,

    /// Trigger a loot-send follow-up after a pass that yielded lootable
    /// received items.
    pub send_on_farming_finished: bool,

    /// Item types allowed to participate in a two-sided trade at all.
    pub matchable_types: HashSet<ItemType>,

    /// Item types that, when received, trigger the farming-finished
    /// follow-up.
    pub lootable_types: HashSet<ItemType>,

    /// Upper bound, in days, on an acceptable trade hold.
    pub max_trade_hold_duration: u8,

    /// `realAppId`s of short-lived-sale games: any trade hold at all on a
    /// trading card from one of these is disqualifying.
    pub short_lived_sale_apps: HashSet<u32>,
}

impl Default for BotTradeConfig {
    fn default() -> Self {
        Self {
            accept_donations: false,
            dont_accept_bot_trades: false,
            steam_trade_matcher: true,
            match_everything: false,
            reject_invalid_trades: false,
            send_on_farming_finished: false,
            matchable_types: HashSet::new(),
            lootable_types: HashSet::new(),
            max_trade_hold_duration: 0,
            short_lived_sale_apps: HashSet::new(),
        }
    }
}
