use crate::model::{ParseTradeResult, TradeOffer};
use parking_lot::Mutex;

/// Out-bound notification surface for plugins observing this engine's
/// decisions, grounded in the narrow, synchronous alert-hook pattern used
/// elsewhere in this ecosystem for risk violations.
pub trait PluginHook: Send + Sync {
    /// Called for an offer the cascade would otherwise ignore or reject.
    /// Returning `true` upgrades the result to [`crate::model::TradeResult::Accepted`].
    fn on_bot_trade_offer(&self, offer: &TradeOffer) -> bool;

    /// Called once per pass with the results of every offer actually acted on.
    fn on_bot_trade_offer_results(&self, results: &[ParseTradeResult]);
}

/// Default hook that never overrides a decision and ignores results.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPluginHook;

impl PluginHook for NoopPluginHook {
    fn on_bot_trade_offer(&self, _offer: &TradeOffer) -> bool {
        false
    }

    fn on_bot_trade_offer_results(&self, _results: &[ParseTradeResult]) {}
}

/// Test/diagnostic hook that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingPluginHook {
    pub offers_seen: Mutex<Vec<TradeOffer>>,
    pub overrides: Mutex<Vec<bool>>,
    pub result_batches: Mutex<Vec<Vec<ParseTradeResult>>>,
}

impl RecordingPluginHook {
    /// Upgrades the next `count` offers it is asked about, in call order,
    /// then falls back to never overriding.
    pub fn overriding(count: usize) -> Self {
        Self {
            overrides: Mutex::new(vec![true; count]),
            ..Default::default()
        }
    }
}

impl PluginHook for RecordingPluginHook {
    fn on_bot_trade_offer(&self, offer: &TradeOffer) -> bool {
        self.offers_seen.lock().push(offer.clone());
        let mut overrides = self.overrides.lock();
        if overrides.is_empty() {
            false
        } else {
            overrides.remove(0)
        }
    }

    fn on_bot_trade_offer_results(&self, results: &[ParseTradeResult]) {
        self.result_batches.lock().push(results.to_vec());
    }
}
