//! Save/load tests: round trips, tolerant decoding, store failure handling.

use byteclicker_core::{
    clock::{Clock, ManualClock},
    command::PlayerCommand,
    config::GameConfig,
    engine::GameEngine,
    event::{GameEvent, PurchaseRejection},
    snapshot,
    state::GameState,
    store::{FileSaveStore, MemorySaveStore, SaveStore, EMPTY_SAVE, SAVE_OK},
};
use proptest::prelude::*;
use std::path::PathBuf;

const START: i64 = 1_700_000_000_000;

fn build_with(store: MemorySaveStore) -> (GameEngine<MemorySaveStore, ManualClock>, ManualClock) {
    let clock = ManualClock::starting_at(START);
    let engine =
        GameEngine::new(GameConfig::default(), store, clock.clone()).expect("build engine");
    (engine, clock)
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("byteclicker-{name}-{}.json", uuid::Uuid::new_v4()))
}

/// Equality on everything that is persisted.
fn without_last_update(state: &GameState) -> GameState {
    GameState { last_update: 0, ..state.clone() }
}

/// Saving then loading restores the game, with last_update moved to now.
#[test]
fn save_then_load_restores_progress() {
    let (mut engine, clock) = build_with(MemorySaveStore::new());
    engine.state_mut().bytes = 500.0;
    for _ in 0..6 {
        engine.buy(0);
    }
    engine.click();
    clock.advance(2_500);
    engine.tick(clock.now());
    engine.save().expect("save");
    let saved = engine.state().clone();
    let blob = engine.store().blob().expect("blob written").to_string();

    let (mut restored, restored_clock) = build_with(MemorySaveStore::with_blob(blob));
    restored_clock.set(START + 90_000);
    let events = restored.load();

    assert_eq!(events, vec![GameEvent::GameLoaded { at: START + 90_000 }]);
    assert_eq!(without_last_update(restored.state()), without_last_update(&saved));
    assert_eq!(restored.state().last_update, START + 90_000);
    assert!(restored.state().generators[1].unlocked);
}

/// Missing, empty and garbage saves leave the current game untouched.
#[test]
fn unusable_saves_keep_current_game() {
    for blob in ["", EMPTY_SAVE, "not json", "[]", "42", "null"] {
        let (mut engine, _) = build_with(MemorySaveStore::with_blob(blob));
        engine.click();
        let before = engine.state().clone();

        let events = engine.load();

        assert_eq!(engine.state(), &before, "blob {blob:?} replaced the game");
        assert!(
            matches!(events.as_slice(), [GameEvent::LoadSkipped { .. }]),
            "blob {blob:?} gave {events:?}"
        );
    }
}

/// A save without a store entry at all is skipped too.
#[test]
fn first_run_has_nothing_to_load() {
    let (mut engine, _) = build_with(MemorySaveStore::new());
    let before = engine.state().clone();

    engine.execute(PlayerCommand::Load).expect("load");

    assert_eq!(engine.state(), &before);
}

/// Fields that are missing or malformed fall back to a fresh game's values.
#[test]
fn partial_save_falls_back_per_field() {
    let blob = r#"{
        "bytes": 123.5,
        "total_bytes": "lots",
        "clicks": -4,
        "extra": { "ignored": true },
        "generators": [
            { "id": 0, "count": 7, "cost": 1, "unlocked": true },
            "garbage",
            { "id": 2, "count": 1.5 }
        ]
    }"#;
    let (mut engine, _) = build_with(MemorySaveStore::with_blob(blob));

    engine.load();

    let state = engine.state();
    assert_eq!(state.bytes, 123.5);
    assert_eq!(state.total_bytes, 0.0);
    assert_eq!(state.clicks, 0);
    assert_eq!(state.game_start, START);
    assert_eq!(state.generators.len(), 7);

    let auto = &state.generators[0];
    assert_eq!(auto.name, "Auto Clicker");
    assert_eq!(auto.count, 7);
    // Edited costs are repriced from the count.
    assert_eq!(auto.cost, 27.0);

    // Seven Auto Clickers unlock the compiler even though the save never said so.
    assert!(state.generators[1].unlocked);
    assert_eq!(state.generators[1].count, 0);
    assert_eq!(state.generators[2].count, 0);
    assert!(!state.generators[2].unlocked);
}

/// Saves that carry a stale last_update still load, rebased to now.
#[test]
fn loads_saves_with_last_update_field() {
    let fresh = GameState::new(&GameConfig::default().generators, 5);
    let mut value: serde_json::Value =
        serde_json::from_str(&snapshot::encode(&fresh).unwrap()).unwrap();
    value["last_update"] = serde_json::json!(1);
    value["bytes"] = serde_json::json!(42.25);

    let state = snapshot::decode(&value.to_string(), &GameConfig::default(), 999).unwrap();

    assert_eq!(state.bytes, 42.25);
    assert_eq!(state.last_update, 999);
    assert_eq!(state.game_start, 5);
}

/// A failing store reports the failure as text and the game carries on.
#[test]
fn failed_save_reports_status() {
    let (mut engine, _) = build_with(MemorySaveStore::failing());
    engine.click();

    let events = engine.save().expect("save does not error");

    match events.as_slice() {
        [GameEvent::GameSaved { status, .. }] => {
            assert!(status.starts_with("Error saving game"), "status: {status}")
        }
        other => panic!("unexpected events {other:?}"),
    }
    assert_eq!(engine.state().clicks, 1);
}

/// New game resets progress and overwrites the save straight away.
#[test]
fn new_game_resets_and_saves() {
    let (mut engine, clock) = build_with(MemorySaveStore::new());
    engine.state_mut().bytes = 1_000.0;
    engine.buy(0);
    engine.click();
    clock.advance(30_000);

    let events = engine.execute(PlayerCommand::NewGame).expect("new game");

    let state = engine.state();
    assert_eq!(state.bytes, 0.0);
    assert_eq!(state.clicks, 0);
    assert_eq!(state.generators[0].count, 0);
    assert_eq!(state.game_start, START + 30_000);
    assert_eq!(events[0], GameEvent::GameReset { at: START + 30_000 });
    assert!(matches!(events[1], GameEvent::GameSaved { .. }));

    let saved = snapshot::decode(
        engine.store().blob().expect("saved"),
        engine.config(),
        START + 30_000,
    )
    .expect("decodable");
    assert_eq!(&saved, state);
}

/// The file store overwrites one file and reads it back.
#[test]
fn file_store_round_trip() {
    let path = scratch_path("roundtrip");
    let mut store = FileSaveStore::new(&path);

    assert_eq!(store.load(), EMPTY_SAVE);
    assert_eq!(store.save(r#"{"bytes":1}"#), SAVE_OK);
    assert_eq!(store.save(r#"{"bytes":2}"#), SAVE_OK);
    assert_eq!(store.load(), r#"{"bytes":2}"#);

    std::fs::remove_file(&path).ok();
}

/// Unwritable and unreadable locations degrade to status text and "{}".
#[test]
fn file_store_failures_are_not_errors() {
    let dir = scratch_path("dir");
    std::fs::create_dir_all(&dir).unwrap();
    // A directory can be neither written nor read as a file.
    let mut store = FileSaveStore::new(&dir);

    let status = store.save("{}");

    assert!(status.starts_with("Error saving game: "), "status: {status}");
    assert_eq!(store.load(), EMPTY_SAVE);

    std::fs::remove_dir_all(&dir).ok();
}

#[derive(Debug, Clone)]
enum Op {
    Click,
    Buy(usize),
    Wait(i64),
    Grant(f64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Click),
        3 => (0usize..8).prop_map(Op::Buy),
        2 => (0i64..120_000).prop_map(Op::Wait),
        1 => (0.0f64..1e6).prop_map(Op::Grant),
    ]
}

proptest! {
    #[test]
    fn prop_load_of_save_restores_any_reachable_state(
        ops in prop::collection::vec(arb_op(), 0..80),
    ) {
        let (mut engine, clock) = build_with(MemorySaveStore::new());
        for op in ops {
            match op {
                Op::Click => { engine.click(); }
                Op::Buy(id) => { engine.buy(id); }
                Op::Wait(ms) => { engine.tick(clock.advance(ms)); }
                Op::Grant(bytes) => {
                    let state = engine.state_mut();
                    state.bytes += bytes;
                    state.total_bytes += bytes;
                }
            }
        }
        engine.save().expect("save");
        let blob = engine.store().blob().expect("blob").to_string();

        let restored = snapshot::decode(&blob, engine.config(), clock.now() + 1)
            .expect("own saves decode");

        prop_assert_eq!(without_last_update(&restored), without_last_update(engine.state()));
    }
}

/// Counts past the point where the price is representable load as infinitely
/// expensive rather than cheap.
#[test]
fn huge_saved_counts_stay_unaffordable() {
    let blob = r#"{ "bytes": 1e300, "generators": [ { "count": 3000000000 } ] }"#;
    let (mut engine, _) = build_with(MemorySaveStore::with_blob(blob));
    engine.load();

    let auto = &engine.state().generators[0];
    assert_eq!(auto.count, 3_000_000_000);
    assert_eq!(auto.cost, f64::INFINITY);

    let before = engine.state().clone();
    let events = engine.buy(0);

    assert_eq!(
        events,
        vec![GameEvent::PurchaseIgnored {
            generator_id: 0,
            reason:       PurchaseRejection::InsufficientFunds,
        }]
    );
    assert_eq!(engine.state(), &before);
}

/// Counts that do not fit a u32 are not trusted at all.
#[test]
fn out_of_range_counts_fall_back() {
    let blob = r#"{ "bytes": 5, "generators": [ { "count": 8589934592 }, { "count": -1 } ] }"#;
    let state = snapshot::decode(blob, &GameConfig::default(), START).expect("decodable");

    assert_eq!(state.generators[0].count, 0);
    assert_eq!(state.generators[0].cost, 10.0);
    assert_eq!(state.generators[1].count, 0);
}

/// A generator at the largest count refuses further purchases instead of
/// overflowing.
#[test]
fn maxed_out_generator_rejects_purchase() {
    let blob = r#"{ "bytes": 1e300, "generators": [ { "count": 4294967295 } ] }"#;
    let (mut engine, _) = build_with(MemorySaveStore::with_blob(blob));
    engine.load();
    assert_eq!(engine.state().generators[0].count, u32::MAX);

    // Even if tooling makes it affordable, the count cannot grow.
    engine.state_mut().generators[0].cost = 9.0;
    let before = engine.state().clone();

    let events = engine.buy(0);

    assert_eq!(
        events,
        vec![GameEvent::PurchaseIgnored {
            generator_id: 0,
            reason:       PurchaseRejection::AtCapacity,
        }]
    );
    assert_eq!(engine.state(), &before);
}

/// Negative timestamps in a save are replaced; extreme ones never panic.
#[test]
fn extreme_saved_timestamps_are_tolerated() {
    let blob = format!(
        r#"{{ "bytes": 1, "game_start": {}, "last_save": {} }}"#,
        i64::MIN,
        i64::MAX
    );
    let (mut engine, _) = build_with(MemorySaveStore::with_blob(blob));
    engine.load();

    assert_eq!(engine.state().bytes, 1.0);
    assert_eq!(engine.state().game_start, START);
    assert_eq!(engine.state().last_save, i64::MAX);
    assert_eq!(engine.dashboard().play_time_ms, 0);

    // Tooling can still force the extremes.
    engine.state_mut().game_start = i64::MIN;
    assert_eq!(engine.dashboard().play_time_ms, i64::MAX);
}

/// Host-supplied tick times at either extreme are absorbed.
#[test]
fn extreme_tick_times_do_not_panic() {
    let (mut engine, clock) = build_with(MemorySaveStore::new());
    engine.state_mut().generators[0].count = 1;

    assert!(engine
        .execute(PlayerCommand::Tick { now_millis: i64::MIN })
        .expect("tick")
        .is_empty());
    assert_eq!(engine.state().last_update, START);

    engine.execute(PlayerCommand::Tick { now_millis: i64::MAX }).expect("tick");
    assert_eq!(engine.state().last_update, i64::MAX);
    assert!(engine.state().bytes > 0.0);

    clock.advance(100);
    engine.pump().expect("pump");
}
