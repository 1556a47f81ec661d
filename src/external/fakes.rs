//! Hand-written test doubles for the [`super`] collaborator traits.

use super::{
    AcceptOutcome, Blacklist, ExternalError, InventorySource, KnownBots, Permissions,
    TradeOfferClient, TradingLock, TradingLockGuard, TwoFactorConfirmer,
};
use crate::model::{AccountId, Item, SetKey, TradeOffer, TradeOfferId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Default)]
pub struct FakeTradeOfferClient {
    pub offers: Mutex<Vec<TradeOffer>>,
    pub accept_result: Mutex<Option<AcceptOutcome>>,
    pub decline_result: Mutex<Option<bool>>,
    pub trade_holds: Mutex<HashMap<TradeOfferId, Option<u8>>>,
    pub accepted_ids: Mutex<Vec<TradeOfferId>>,
    pub declined_ids: Mutex<Vec<TradeOfferId>>,
    pub fetch_count: Mutex<u32>,
}

#[async_trait]
impl TradeOfferClient for FakeTradeOfferClient {
    async fn get_active_trade_offers(&self) -> Result<Vec<TradeOffer>, ExternalError> {
        *self.fetch_count.lock() += 1;
        Ok(self.offers.lock().clone())
    }

    async fn accept_trade_offer(&self, id: TradeOfferId) -> Result<AcceptOutcome, ExternalError> {
        self.accepted_ids.lock().push(id);
        Ok((*self.accept_result.lock()).unwrap_or(AcceptOutcome {
            success: true,
            requires_confirmation: false,
        }))
    }

    async fn decline_trade_offer(&self, id: TradeOfferId) -> Result<bool, ExternalError> {
        self.declined_ids.lock().push(id);
        Ok((*self.decline_result.lock()).unwrap_or(true))
    }

    async fn get_trade_hold_duration(
        &self,
        _other: AccountId,
        id: TradeOfferId,
    ) -> Result<Option<u8>, ExternalError> {
        Ok(self
            .trade_holds
            .lock()
            .get(&id)
            .copied()
            .unwrap_or(Some(0)))
    }
}

#[derive(Default)]
pub struct FakeInventorySource {
    pub items: Mutex<Vec<Item>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl InventorySource for FakeInventorySource {
    async fn inventory(
        &self,
        _account: AccountId,
        wanted: &HashSet<SetKey>,
    ) -> Result<Vec<Item>, ExternalError> {
        if *self.fail.lock() {
            return Err(ExternalError::Transport("inventory fetch failed".into()));
        }
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|item| wanted.contains(&item.set_key()))
            .copied()
            .collect())
    }
}

#[derive(Default)]
pub struct FakeTwoFactorConfirmer {
    pub has_authenticator: bool,
    pub succeed: Mutex<bool>,
    pub confirmed: Mutex<Vec<TradeOfferId>>,
}

#[async_trait]
impl TwoFactorConfirmer for FakeTwoFactorConfirmer {
    async fn confirm_trades(
        &self,
        ids: &[TradeOfferId],
        _wait_if_necessary: bool,
    ) -> Result<bool, ExternalError> {
        self.confirmed.lock().extend_from_slice(ids);
        Ok(*self.succeed.lock())
    }

    fn has_authenticator(&self) -> bool {
        self.has_authenticator
    }
}

#[derive(Default)]
pub struct FakeKnownBots {
    pub bots: HashSet<AccountId>,
}

impl KnownBots for FakeKnownBots {
    fn is_own_bot(&self, account: AccountId) -> bool {
        self.bots.contains(&account)
    }
}

#[derive(Default)]
pub struct FakeBlacklist {
    pub blacklisted: HashSet<AccountId>,
}

impl Blacklist for FakeBlacklist {
    fn is_blacklisted(&self, account: AccountId) -> bool {
        self.blacklisted.contains(&account)
    }
}

#[derive(Default)]
pub struct FakePermissions {
    pub masters: HashSet<AccountId>,
}

impl Permissions for FakePermissions {
    fn has_master_permission(&self, account: AccountId) -> bool {
        self.masters.contains(&account)
    }
}

/// In-process stand-in for the outer subsystem's account-wide trading lock.
#[derive(Default, Clone)]
pub struct FakeTradingLock {
    inner: Arc<tokio::sync::Mutex<()>>,
}

#[async_trait]
impl TradingLock for FakeTradingLock {
    async fn acquire(&self) -> TradingLockGuard {
        let guard = self.inner.clone().lock_owned().await;
        TradingLockGuard::new(move || drop(guard))
    }
}
