//! End-to-end engine scenarios driven through `MarketMaker::handle`.

use std::collections::HashMap;

use etfmm_core::{
    BookUpdate, ClientOrderId, EngineEvent, InsertOrder, Instrument, OrderAction, Price, Side,
    Volume,
};
use etfmm_mm::{MakerConfig, MarketMaker};

fn maker() -> MarketMaker {
    MarketMaker::new(MakerConfig::default()).expect("default config is valid")
}

fn book(
    sequence: u64,
    ask_prices: [Price; 5],
    ask_volumes: [Volume; 5],
    bid_prices: [Price; 5],
    bid_volumes: [Volume; 5],
) -> EngineEvent {
    EngineEvent::OrderBook(BookUpdate {
        instrument: Instrument::Etf,
        sequence,
        ask_prices,
        ask_volumes,
        bid_prices,
        bid_volumes,
    })
}

/// Single-level book with equal volumes.
fn simple_book(sequence: u64, ask: Price, bid: Price) -> EngineEvent {
    book(
        sequence,
        [ask, 0, 0, 0, 0],
        [10, 0, 0, 0, 0],
        [bid, 0, 0, 0, 0],
        [10, 0, 0, 0, 0],
    )
}

fn tight_book(sequence: u64) -> EngineEvent {
    book(
        sequence,
        [10_100; 5],
        [10; 5],
        [10_000; 5],
        [10; 5],
    )
}

fn status(id: u64, remaining: Volume) -> EngineEvent {
    EngineEvent::OrderStatus {
        client_order_id: ClientOrderId::new(id),
        fill_volume: 0,
        remaining_volume: remaining,
        fees: 0,
    }
}

fn fill(id: u64, price: Price, volume: Volume) -> EngineEvent {
    EngineEvent::OrderFilled {
        client_order_id: ClientOrderId::new(id),
        price,
        volume,
    }
}

fn inserts(actions: &[OrderAction]) -> Vec<InsertOrder> {
    actions
        .iter()
        .filter_map(|a| match a {
            OrderAction::Insert(o) => Some(o.clone()),
            _ => None,
        })
        .collect()
}

fn cancel_ids(actions: &[OrderAction]) -> Vec<u64> {
    actions
        .iter()
        .filter_map(|a| match a {
            OrderAction::Cancel(c) => Some(c.client_order_id.get()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_empty_ask_side_quotes_spread_above_bid() {
    let mut mm = maker();
    let actions = mm.handle(&book(
        1,
        [0; 5],
        [0; 5],
        [100, 99, 0, 0, 0],
        [50, 50, 0, 0, 0],
    ));

    let orders = inserts(&actions);
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].side, Side::Sell);
    assert_eq!(orders[0].price, 700);
    assert_eq!(orders[1].side, Side::Buy);
    assert_eq!(orders[1].price, 100);
    assert!(!mm.is_halted());
}

#[test]
fn test_depth_exhaustion_halts_and_flattens_once() {
    let mut mm = maker();
    let opened = mm.handle(&simple_book(1, 11_000, 10_000));
    assert_eq!(inserts(&opened).len(), 2);

    let actions = mm.handle(&tight_book(2));
    assert!(mm.is_halted());
    assert!(inserts(&actions).is_empty());
    assert_eq!(cancel_ids(&actions), vec![1, 2]);

    let snapshot = mm.status();
    assert_eq!(snapshot.ask.order_id, None);
    assert_eq!(snapshot.bid.order_id, None);
    assert_eq!(snapshot.ask.target_price, 0);
    assert_eq!(snapshot.ask_pending, None);

    // Staying halted sends nothing more.
    assert!(mm.handle(&tight_book(3)).is_empty());

    // Cancel confirmations while halted place nothing.
    assert!(mm.handle(&status(1, 0)).is_empty());
    assert!(mm.handle(&status(2, 0)).is_empty());
    assert_eq!(mm.status().outstanding_asks, 0);
}

#[test]
fn test_selling_pressure_shifts_quote_up_one_tick() {
    let mut mm = maker();
    let ticks = BookUpdate {
        instrument: Instrument::Etf,
        sequence: 1,
        ask_prices: [10_500, 10_600, 0, 0, 0],
        ask_volumes: [200, 100, 0, 0, 0],
        bid_prices: [10_400, 0, 0, 0, 0],
        bid_volumes: [50, 0, 0, 0, 0],
    };
    assert!(mm.handle(&EngineEvent::TradeTicks(ticks)).is_empty());

    let actions = mm.handle(&simple_book(1, 11_000, 10_000));
    let orders = inserts(&actions);
    assert_eq!(orders[0].price, 11_000);
    assert_eq!(orders[1].price, 10_200);

    // Flow resets after the snapshot: the same book requotes without skew.
    let actions = mm.handle(&simple_book(2, 11_000, 10_000));
    assert_eq!(cancel_ids(&actions), vec![1, 2]);
    assert_eq!(mm.status().ask.target_price, 10_900);
    assert_eq!(mm.status().bid.target_price, 10_100);
}

#[test]
fn test_flow_resets_even_when_halted() {
    let mut mm = maker();
    let ticks = BookUpdate {
        instrument: Instrument::Etf,
        sequence: 1,
        ask_prices: [10_500, 0, 0, 0, 0],
        ask_volumes: [300, 0, 0, 0, 0],
        bid_prices: [10_400, 0, 0, 0, 0],
        bid_volumes: [50, 0, 0, 0, 0],
    };
    mm.handle(&EngineEvent::TradeTicks(ticks));
    mm.handle(&tight_book(1));

    let orders = inserts(&mm.handle(&simple_book(2, 11_000, 10_000)));
    assert_eq!(orders[0].price, 10_900);
    assert_eq!(orders[1].price, 10_100);
}

#[test]
fn test_huge_trade_tick_volumes_skew_without_overflow() {
    let mut mm = maker();
    let ticks = BookUpdate {
        instrument: Instrument::Etf,
        sequence: 1,
        ask_volumes: [u64::MAX / 2, u64::MAX / 2, 10, 0, 0],
        ..Default::default()
    };
    assert!(mm.handle(&EngineEvent::TradeTicks(ticks)).is_empty());

    let orders = inserts(&mm.handle(&simple_book(1, 11_000, 10_000)));
    assert_eq!(orders[0].price, 11_000);
    assert_eq!(orders[1].price, 10_200);
}

#[test]
fn test_cancel_replace_cycle_waits_for_confirmation() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000)); // ask 10_900 (#1), bid 10_100 (#2)

    let actions = mm.handle(&simple_book(2, 11_200, 10_000));
    assert_eq!(cancel_ids(&actions), vec![1]);
    assert!(inserts(&actions).is_empty());
    assert_eq!(mm.status().ask_pending, Some(ClientOrderId::new(1)));

    // Target moves again before the cancel lands: nothing to send.
    assert!(mm.handle(&simple_book(3, 11_400, 10_000)).is_empty());

    // Partial status for the cancelled order changes nothing.
    assert!(mm.handle(&status(1, 10)).is_empty());

    let actions = mm.handle(&status(1, 0));
    let orders = inserts(&actions);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].client_order_id, ClientOrderId::new(3));
    assert_eq!(orders[0].side, Side::Sell);
    assert_eq!(orders[0].price, 11_300);
    assert_eq!(orders[0].volume, 100);
    assert_eq!(mm.status().ask_pending, None);
}

#[test]
fn test_fills_move_position_hedge_and_resize_replacements() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000));

    let hedge = mm.handle(&fill(1, 10_900, 30));
    match hedge.as_slice() {
        [OrderAction::Hedge(h)] => {
            assert_eq!(h.client_order_id, ClientOrderId::new(3));
            assert_eq!(h.side, Side::Buy);
            assert_eq!(h.price, 100);
            assert_eq!(h.volume, 30);
        }
        other => panic!("expected one hedge, got {other:?}"),
    }
    assert_eq!(mm.position(), -30);

    let hedge = mm.handle(&fill(2, 10_100, 10));
    match hedge.as_slice() {
        [OrderAction::Hedge(h)] => {
            assert_eq!(h.client_order_id, ClientOrderId::new(4));
            assert_eq!(h.side, Side::Sell);
            assert_eq!(h.price, 2_147_483_600);
        }
        other => panic!("expected one hedge, got {other:?}"),
    }
    assert_eq!(mm.position(), -20);

    // Both sides move; replacements use the new sizes (ask 80, bid 120).
    let actions = mm.handle(&simple_book(2, 11_200, 9_800));
    assert_eq!(cancel_ids(&actions), vec![1, 2]);

    let ask = inserts(&mm.handle(&status(1, 0)));
    assert_eq!(ask[0].client_order_id, ClientOrderId::new(5));
    assert_eq!(ask[0].price, 11_100);
    assert_eq!(ask[0].volume, 80);

    let bid = inserts(&mm.handle(&status(2, 0)));
    assert_eq!(bid[0].client_order_id, ClientOrderId::new(6));
    assert_eq!(bid[0].price, 9_900);
    assert_eq!(bid[0].volume, 120);

    let snapshot = mm.status();
    assert_eq!(snapshot.fill_count, 2);
    assert_eq!(snapshot.hedges_sent, 2);
}

#[test]
fn test_side_at_capacity_is_not_quoted() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000));
    mm.handle(&fill(2, 10_100, 100)); // long 100: bid size 0

    let actions = mm.handle(&simple_book(2, 11_200, 9_800));
    assert_eq!(cancel_ids(&actions), vec![1, 2]);
    let ask = inserts(&mm.handle(&status(1, 0)));
    assert_eq!(ask[0].volume, 200);
    assert!(mm.handle(&status(2, 0)).is_empty());
    assert_eq!(mm.status().bid.order_id, None);
}

#[test]
fn test_error_on_pending_order_triggers_replacement() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000));
    mm.handle(&simple_book(2, 11_200, 10_000));

    let actions = mm.handle(&EngineEvent::Error {
        client_order_id: ClientOrderId::new(1),
        message: "order not found".to_string(),
    });
    let orders = inserts(&actions);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].price, 11_100);
    assert_eq!(mm.status().outstanding_asks, 1);
}

#[test]
fn test_error_on_live_order_clears_side() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000));

    let actions = mm.handle(&EngineEvent::Error {
        client_order_id: ClientOrderId::new(2),
        message: "price out of range".to_string(),
    });
    assert!(actions.is_empty());
    let snapshot = mm.status();
    assert_eq!(snapshot.bid.order_id, None);
    assert_eq!(snapshot.outstanding_bids, 0);
    assert_eq!(snapshot.ask.order_id, Some(ClientOrderId::new(1)));
}

#[test]
fn test_halt_cancels_only_live_orders() {
    let mut mm = maker();
    mm.handle(&simple_book(1, 11_000, 10_000));
    mm.handle(&simple_book(2, 11_200, 10_000)); // ask #1 cancel in flight

    let actions = mm.handle(&tight_book(3));
    assert_eq!(cancel_ids(&actions), vec![2]);

    assert!(mm.handle(&status(1, 0)).is_empty());
    assert!(mm.handle(&status(2, 0)).is_empty());

    // Resume: both sides quoted afresh.
    let orders = inserts(&mm.handle(&simple_book(4, 11_000, 10_000)));
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].client_order_id, ClientOrderId::new(3));
    assert_eq!(orders[1].client_order_id, ClientOrderId::new(4));
    assert!(!mm.is_halted());
}

/// Minimal deterministic generator for the randomized walk below.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }
}

fn random_book(rng: &mut Lcg, sequence: u64) -> EngineEvent {
    let ask = 10_000 + (rng.next() % 20) * 100;
    let bid = ask.saturating_sub((rng.next() % 12) * 100);
    let mut ask_prices = [0; 5];
    let mut bid_prices = [0; 5];
    let mut ask_volumes = [0; 5];
    let mut bid_volumes = [0; 5];
    let levels = (rng.next() % 6) as usize;
    for i in 0..levels {
        ask_prices[i] = ask + i as u64 * 100;
        bid_prices[i] = bid.saturating_sub(i as u64 * 100);
        ask_volumes[i] = 1 + rng.next() % 50;
        bid_volumes[i] = 1 + rng.next() % 50;
    }
    if rng.next() % 8 == 0 {
        ask_prices = [0; 5];
    }
    if rng.next() % 8 == 0 {
        bid_prices = [0; 5];
    }
    book(sequence, ask_prices, ask_volumes, bid_prices, bid_volumes)
}

#[test]
fn test_randomized_walk_keeps_lifecycle_invariants() {
    let mut mm = maker();
    let mut rng = Lcg(7);

    // Orders the simulated exchange still holds, and those we asked to cancel.
    let mut live: HashMap<ClientOrderId, Side> = HashMap::new();
    let mut cancelling: Vec<ClientOrderId> = Vec::new();
    let mut sequence = 0;

    for _ in 0..2_000 {
        let before = mm.status();
        let roll = rng.next() % 10;

        let event = match roll {
            0..=3 => {
                sequence += 1;
                random_book(&mut rng, sequence)
            }
            4..=6 if !cancelling.is_empty() => {
                let idx = (rng.next() as usize) % cancelling.len();
                let id = cancelling.remove(idx);
                status(id.get(), 0)
            }
            7 if !live.is_empty() => {
                let mut ids: Vec<_> = live.keys().copied().collect();
                ids.sort();
                let id = ids[(rng.next() as usize) % ids.len()];
                fill(id.get(), 10_000, 1 + rng.next() % 20)
            }
            _ => {
                sequence += 1;
                EngineEvent::TradeTicks(BookUpdate {
                    instrument: Instrument::Etf,
                    sequence,
                    ask_volumes: [rng.next() % 200, 0, 0, 0, 0],
                    bid_volumes: [rng.next() % 200, 0, 0, 0, 0],
                    ..Default::default()
                })
            }
        };

        let confirmed = match &event {
            EngineEvent::OrderStatus {
                client_order_id, ..
            } => Some(*client_order_id),
            _ => None,
        };
        if let Some(id) = confirmed {
            live.remove(&id);
        }

        let actions = mm.handle(&event);
        let after = mm.status();

        for action in &actions {
            match action {
                OrderAction::Insert(order) => {
                    let pending = match order.side {
                        Side::Sell => before.ask_pending,
                        Side::Buy => before.bid_pending,
                    };
                    match confirmed {
                        // A confirmation may release exactly the order it confirms.
                        Some(id) => assert_eq!(pending, Some(id)),
                        None => assert_eq!(pending, None, "insert while cancel in flight"),
                    }
                    assert!(!after.halted, "insert while halted");
                    assert!(order.volume > 0);
                    live.insert(order.client_order_id, order.side);
                }
                OrderAction::Cancel(cancel) => {
                    assert!(
                        live.contains_key(&cancel.client_order_id),
                        "cancel for an order not resting"
                    );
                    live.remove(&cancel.client_order_id);
                    assert!(
                        !cancelling.contains(&cancel.client_order_id),
                        "order cancelled twice"
                    );
                    cancelling.push(cancel.client_order_id);
                }
                OrderAction::Hedge(_) => {}
            }
        }

        for side in [Side::Sell, Side::Buy] {
            let resting = live.values().filter(|s| **s == side).count();
            assert!(resting <= 1, "more than one live order on {side}");
        }
        assert_eq!(after.ask.order_id.is_some(), live.values().any(|s| *s == Side::Sell));
        assert_eq!(after.bid.order_id.is_some(), live.values().any(|s| *s == Side::Buy));
    }
}
