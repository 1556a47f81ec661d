pub mod error;
pub mod fakes;

use crate::model::{AccountId, Item, SetKey, TradeOffer, TradeOfferId};
use async_trait::async_trait;
use error::ExternalError;
use std::collections::HashSet;

/// Outcome of an accept attempt, carrying whether a mobile/app confirmation
/// is still required before the trade actually completes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AcceptOutcome {
    pub success: bool,
    pub requires_confirmation: bool,
}

/// Contract for the trading service's offer listing and accept/decline API.
#[async_trait]
pub trait TradeOfferClient: Send + Sync {
    async fn get_active_trade_offers(&self) -> Result<Vec<TradeOffer>, ExternalError>;
    async fn accept_trade_offer(&self, id: TradeOfferId) -> Result<AcceptOutcome, ExternalError>;
    async fn decline_trade_offer(&self, id: TradeOfferId) -> Result<bool, ExternalError>;
    async fn get_trade_hold_duration(
        &self,
        other: AccountId,
        id: TradeOfferId,
    ) -> Result<Option<u8>, ExternalError>;
}

/// Contract for fetching an account's own inventory, filtered to the
/// `SetKey`s a decision actually needs.
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn inventory(
        &self,
        account: AccountId,
        wanted: &HashSet<SetKey>,
    ) -> Result<Vec<Item>, ExternalError>;
}

/// Contract for batch two-factor / mobile confirmation of already-accepted
/// trades.
#[async_trait]
pub trait TwoFactorConfirmer: Send + Sync {
    async fn confirm_trades(
        &self,
        ids: &[TradeOfferId],
        wait_if_necessary: bool,
    ) -> Result<bool, ExternalError>;

    /// Whether this account has a mobile authenticator registered at all.
    fn has_authenticator(&self) -> bool;
}

/// Recognizes counterparties that are other bots of the same fleet.
pub trait KnownBots: Send + Sync {
    fn is_own_bot(&self, account: AccountId) -> bool;
}

/// Recognizes counterparties that have been blacklisted.
pub trait Blacklist: Send + Sync {
    fn is_blacklisted(&self, account: AccountId) -> bool;
}

/// Recognizes counterparties granted elevated trust (unconditional accept).
pub trait Permissions: Send + Sync {
    fn has_master_permission(&self, account: AccountId) -> bool;
}

/// RAII guard released by dropping it. Type-erases whatever the outer
/// subsystem actually uses (a `tokio::sync::MutexGuard`, a distributed
/// lock lease, ...) behind a release closure.
pub struct TradingLockGuard(Option<Box<dyn FnOnce() + Send>>);

impl TradingLockGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(release)))
    }
}

impl Drop for TradingLockGuard {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

/// The outer, account-wide lock that serializes this engine's trading
/// mutations against unrelated subsystems (e.g. a loot/transfer job)
/// touching the same account.
///
/// Modeled as a trait rather than a concrete `tokio::sync::Mutex` because it
/// is owned by an outer subsystem not modeled in this crate.
#[async_trait]
pub trait TradingLock: Send + Sync {
    async fn acquire(&self) -> TradingLockGuard;
}
