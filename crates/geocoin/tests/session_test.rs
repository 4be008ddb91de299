//! # Game Session Integration Test
//!
//! Plays whole sessions: walk, poke, deposit, save, reload, reset.

use geocoin::{
    Direction, GameConfig, GameError, GameSession, KeyValueStore, MemoryStore, SaveSnapshot,
    CACHE_MEMENTOS_KEY, PLAYER_COINS_KEY,
};
use geocoin_economy::Coin;
use geocoin_procedural::{Cell, GeoPoint, WorldSeed};

fn config() -> GameConfig {
    GameConfig {
        world_seed: WorldSeed::new(31_337),
        neighborhood_size: 4,
        max_coins_per_cache: 10,
        ..GameConfig::default()
    }
}

/// Finds a cell with a cache of at least `n` coins near the player.
fn stocked_cell(session: &mut GameSession, n: usize) -> Cell {
    for _ in 0..200 {
        let found = session
            .visible_caches()
            .unwrap()
            .into_iter()
            .find(|c| c.len() >= n)
            .map(|c| c.cell());
        if let Some(cell) = found {
            return cell;
        }
        session.step(Direction::East).unwrap();
    }
    panic!("no cache with {n} coins within 200 cells");
}

/// Test: The walkthrough scenario, poke then revisit.
#[test]
fn test_poke_persists_across_views() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 3);

    let before = session.cache(cell).unwrap();
    let count = before.len();

    let coin = session.poke(cell).unwrap().unwrap();
    assert_eq!(coin, Coin::new(cell, 0));
    assert_eq!(session.points(), 1);
    assert_eq!(session.inventory().coins().back(), Some(&coin));

    // Walk away and come back.
    for _ in 0..20 {
        session.step(Direction::North).unwrap();
    }
    for _ in 0..20 {
        session.step(Direction::South).unwrap();
    }

    let after = session.cache(cell).unwrap();
    assert_eq!(after.len(), count - 1);
    assert_eq!(after.coins().front(), Some(&Coin::new(cell, 1)));
}

/// Test: Only withdrawals score points.
#[test]
fn test_points_count_withdrawals() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 2);

    session.poke(cell).unwrap().unwrap();
    session.poke(cell).unwrap().unwrap();
    assert_eq!(session.points(), 2);

    session.deposit(cell).unwrap().unwrap();
    assert_eq!(session.points(), 2);
    assert_eq!(session.inventory().len(), 1);
}

/// Test: Empty sources move nothing and score nothing.
#[test]
fn test_empty_transfers() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 1);

    assert_eq!(session.deposit(cell).unwrap(), None);

    while session.poke(cell).unwrap().is_some() {}
    let points = session.points();
    assert_eq!(session.poke(cell).unwrap(), None);
    assert_eq!(session.points(), points);
    assert!(session.cache(cell).unwrap().is_empty());
}

/// Test: Coins are conserved through a long walk.
#[test]
fn test_conservation_during_walk() {
    let mut session = GameSession::new(config()).unwrap();
    let generator = *session.caches().generator();

    for step in 0..60 {
        session.step(Direction::ALL[step % 4 / 2 * 2]).unwrap();
        let visible = session.visible_caches().unwrap();
        if let Some(cache) = visible.first() {
            session.poke(cache.cell()).unwrap();
        }
        if let Some(cache) = visible.last() {
            session.deposit(cache.cell()).unwrap();
        }
    }

    let minted: usize = session
        .caches()
        .export_mementos()
        .keys()
        .map(|k| generator.initial_coin_count(&k.parse::<Cell>().unwrap()) as usize)
        .sum();
    assert_eq!(session.total_coins().unwrap(), minted);
}

/// Test: Save then load into a fresh session restores everything.
#[test]
fn test_save_load_round_trip() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 2);
    session.poke(cell).unwrap();
    session.relocate(GeoPoint::new(36.99, -122.06)).unwrap();

    let mut store = MemoryStore::new();
    session.save_to(&mut store).unwrap();

    let mut fresh = GameSession::new(config()).unwrap();
    fresh.load_from(&store).unwrap();

    assert_eq!(fresh.snapshot(), session.snapshot());
    assert_eq!(fresh.points(), 1);
    assert_eq!(fresh.cache(cell).unwrap(), session.cache(cell).unwrap());
}

/// Test: A fresh store loads as a new game.
#[test]
fn test_load_from_empty_store() {
    let mut session = GameSession::new(config()).unwrap();
    session.load_from(&MemoryStore::new()).unwrap();
    assert_eq!(session.snapshot(), SaveSnapshot::default());
}

/// Test: Malformed saves are rejected without touching the session.
#[test]
fn test_load_rejects_malformed_save() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 1);
    session.poke(cell).unwrap();
    let before = session.snapshot();

    let mut store = MemoryStore::new();
    store.set(PLAYER_COINS_KEY, "{".to_owned());
    assert!(matches!(
        session.load_from(&store),
        Err(GameError::Snapshot { .. })
    ));

    let mut store = MemoryStore::new();
    store.set(CACHE_MEMENTOS_KEY, r#"[["north","{}"]]"#.to_owned());
    assert!(matches!(
        session.load_from(&store),
        Err(GameError::Economy(_))
    ));

    let mut store = MemoryStore::new();
    store.set(CACHE_MEMENTOS_KEY, r#"[["1,2","{}"],["1, 2","{}"]]"#.to_owned());
    assert!(matches!(
        session.load_from(&store),
        Err(GameError::Economy(_))
    ));
    assert_eq!(session.snapshot(), before);
}

/// Test: A corrupt memento degrades to regenerated content.
#[test]
fn test_corrupt_memento_regenerates() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 1);
    let pristine = session.cache(cell).unwrap();
    session.poke(cell).unwrap();

    let mut snapshot = session.snapshot();
    for (key, blob) in &mut snapshot.cache_mementos {
        if *key == cell.key() {
            *blob = "{not a memento".to_owned();
        }
    }
    session.restore(snapshot).unwrap();

    assert_eq!(session.cache(cell).unwrap(), pristine);
}

/// Test: Reset forgets coins, points, history and cache mutations.
#[test]
fn test_reset() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 1);
    let pristine = session.cache(cell).unwrap();
    session.poke(cell).unwrap();
    let position = **session.position();

    session.reset();

    assert!(session.inventory().is_empty());
    assert!(session.history().is_empty());
    assert_eq!(session.points(), 0);
    assert_eq!(**session.position(), position);
    assert_eq!(session.cache(cell).unwrap(), pristine);
}

/// Test: Erasing removes the save but not the live session.
#[test]
fn test_erase_save() {
    let mut session = GameSession::new(config()).unwrap();
    let cell = stocked_cell(&mut session, 1);
    session.poke(cell).unwrap();

    let mut store = MemoryStore::new();
    session.save_to(&mut store).unwrap();
    GameSession::erase_from(&mut store);

    assert!(store.is_empty());
    assert_eq!(session.points(), 1);
}

/// Test: Config loads from TOML with defaults for missing fields.
#[test]
fn test_session_from_toml() {
    let config = GameConfig::from_toml_str(
        r"
        neighborhood_size = 1
        world_seed = 5

        [origin]
        lat = 0.00015
        lng = -0.00025
        ",
    )
    .unwrap();
    let session = GameSession::new(config).unwrap();

    assert_eq!(**session.position(), Cell::new(-3, 1));
    assert_eq!(session.nearby_cells().unwrap().len(), 9);
}

/// Test: Two sessions with the same seed see the same world.
#[test]
fn test_same_seed_same_world() {
    let mut a = GameSession::new(config()).unwrap();
    let mut b = GameSession::new(config()).unwrap();
    assert_eq!(a.visible_caches().unwrap(), b.visible_caches().unwrap());

    let mut c = GameSession::new(GameConfig {
        world_seed: WorldSeed::new(1),
        ..config()
    })
    .unwrap();
    let cells = |s: &mut GameSession| -> Vec<Cell> {
        s.visible_caches().unwrap().iter().map(|c| c.cell()).collect()
    };
    assert_ne!(cells(&mut a), cells(&mut c));
}
