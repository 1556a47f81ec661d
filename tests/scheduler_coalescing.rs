use std::sync::Arc;
use std::time::Duration;

use tradeoffer_engine::config::BotTradeConfig;
use tradeoffer_engine::external::fakes::{
    FakeBlacklist, FakeInventorySource, FakeKnownBots, FakePermissions, FakeTradeOfferClient,
    FakeTradingLock, FakeTwoFactorConfirmer,
};
use tradeoffer_engine::external::TradingLock;
use tradeoffer_engine::model::{AccountId, Item, ItemRarity, ItemType, TradeOffer, TradeOfferId, TradeOfferState};
use tradeoffer_engine::pipeline::handled_offer_set::HandledOfferSet;
use tradeoffer_engine::plugin::NoopPluginHook;
use tradeoffer_engine::scheduler::Scheduler;

fn card(class_id: u64, amount: u32) -> Item {
    Item::new(100, 100, class_id, ItemType::TradingCard, ItemRarity::Common, amount, true, true)
}

fn offer(id: u64, receive: Vec<Item>) -> TradeOffer {
    TradeOffer::new(TradeOfferId(id), AccountId(2), TradeOfferState::Active, vec![], receive)
}

/// K rapid `on_new_trade` calls while a pass is in flight should coalesce
/// into exactly one additional pass, not K.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rapid_triggers_during_an_in_flight_pass_coalesce_to_one_extra_pass() {
    let mut config = BotTradeConfig::default();
    config.accept_donations = true;

    let permissions = FakePermissions::default();
    let blacklist = FakeBlacklist::default();
    let known_bots = FakeKnownBots::default();
    let client = FakeTradeOfferClient::default();
    *client.offers.lock() = vec![offer(1, vec![card(1, 1)])];
    let inventory_source = FakeInventorySource::default();
    let two_factor = FakeTwoFactorConfirmer::default();
    let trading_lock = FakeTradingLock::default();
    let handled = HandledOfferSet::new();
    let plugin = NoopPluginHook;

    let scheduler = Arc::new(Scheduler::new(
        AccountId(1),
        &config,
        &permissions,
        &blacklist,
        &known_bots,
        &client,
        &inventory_source,
        &two_factor,
        &trading_lock,
        &plugin,
        &handled,
    ));

    // Hold the outer lock so the first on_new_trade call stalls right after
    // clearing the scheduling flag, giving every other call below a window
    // to observe "already scheduled" and piggy-back rather than re-trigger.
    let held = trading_lock.acquire().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let scheduler = scheduler.clone();
        handles.push(tokio::spawn(async move {
            scheduler.on_new_trade().await;
        }));
    }

    tokio::time::sleep(Duration::from_millis(20)).await;
    drop(held);

    for handle in handles {
        handle.await.unwrap();
    }

    // Exactly one pass ran before the lock was released (none could, since
    // it blocked the acquire), plus at most one coalesced follow-up pass.
    assert!(*client.fetch_count.lock() <= 2, "expected at most 2 passes, got {}", *client.fetch_count.lock());
    assert_eq!(client.accepted_ids.lock().len(), 1);
}

#[tokio::test]
async fn sequential_triggers_each_run_their_own_pass() {
    let mut config = BotTradeConfig::default();
    config.accept_donations = true;

    let permissions = FakePermissions::default();
    let blacklist = FakeBlacklist::default();
    let known_bots = FakeKnownBots::default();
    let client = FakeTradeOfferClient::default();
    let inventory_source = FakeInventorySource::default();
    let two_factor = FakeTwoFactorConfirmer::default();
    let trading_lock = FakeTradingLock::default();
    let handled = HandledOfferSet::new();
    let plugin = NoopPluginHook;

    let scheduler = Scheduler::new(
        AccountId(1),
        &config,
        &permissions,
        &blacklist,
        &known_bots,
        &client,
        &inventory_source,
        &two_factor,
        &trading_lock,
        &plugin,
        &handled,
    );

    *client.offers.lock() = vec![offer(1, vec![card(1, 1)])];
    scheduler.on_new_trade().await;
    assert_eq!(*client.fetch_count.lock(), 1);

    *client.offers.lock() = vec![offer(2, vec![card(2, 1)])];
    scheduler.on_new_trade().await;
    assert_eq!(*client.fetch_count.lock(), 2);
    assert_eq!(client.accepted_ids.lock().len(), 2);
}
