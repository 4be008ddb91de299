//! # Walk Simulation
//!
//! Headless player walking a square spiral around the origin:
//! 1. Pokes the first stocked cache in reach after every step
//! 2. Deposits into another visible cache every third step
//! 3. Saves, reloads into a fresh session, compares
//! 4. Checks that no coin was created or lost
//!
//! Usage: `walk_simulation [config.toml]`

use std::time::Instant;

use geocoin::{Direction, GameConfig, GameResult, GameSession, MemoryStore};
use geocoin_procedural::Cell;

const STEPS: usize = 240;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         GEOCOIN - WALK SIMULATION                                ║");
    println!("║         Walk, poke, deposit, save, reload, verify                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    match run() {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Simulation failed: {e}");
            std::process::exit(2);
        }
    }
}

fn run() -> GameResult<bool> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let start = Instant::now();
    let mut session = GameSession::new(config.clone())?;
    let mut pokes = 0u64;
    let mut deposits = 0usize;

    for step in 0..STEPS {
        session.step(spiral_direction(step))?;

        let visible = session.visible_caches()?;
        if let Some(cache) = visible.iter().find(|c| !c.is_empty()) {
            if session.poke(cache.cell())?.is_some() {
                pokes += 1;
            }
        }
        if step % 3 == 2 {
            if let Some(cache) = visible.last() {
                if session.deposit(cache.cell())?.is_some() {
                    deposits += 1;
                }
            }
        }
    }
    let walk_time = start.elapsed();

    println!();
    println!("  Steps:            {STEPS}");
    println!("  Pokes:            {pokes}");
    println!("  Deposits:         {deposits}");
    println!("  Points:           {}", session.points());
    println!("  Coins held:       {}", session.inventory().len());
    println!("  Caches stored:    {}", session.caches().len());
    println!("  Cells indexed:    {}", session.grid().known_cell_count());
    println!("  Walk time:        {walk_time:?}");

    let mut store = MemoryStore::new();
    let save_start = Instant::now();
    session.save_to(&mut store)?;
    let mut reloaded = GameSession::new(config)?;
    reloaded.load_from(&store)?;
    let reload_time = save_start.elapsed();
    println!("  Save + reload:    {reload_time:?}");
    println!();

    let minted = minted_coins(&session)?;
    let checks = [
        ("Coins conserved", session.total_coins()? == minted),
        ("Points equal pokes", session.points() == pokes),
        ("Reload matches", reloaded.snapshot() == session.snapshot()),
        (
            "Reload conserves",
            reloaded.total_coins()? == session.total_coins()?,
        ),
    ];

    let mut passed = true;
    for (name, ok) in checks {
        println!("  [{}] {name}", if ok { "PASS" } else { "FAIL" });
        passed &= ok;
    }
    Ok(passed)
}

/// Direction for the given step of an outward square spiral.
fn spiral_direction(step: usize) -> Direction {
    // Leg lengths 1, 1, 2, 2, 3, 3, ...
    let mut remaining = step;
    let mut leg = 0usize;
    loop {
        let length = leg / 2 + 1;
        if remaining < length {
            return Direction::ALL[[0, 2, 1, 3][leg % 4]];
        }
        remaining -= length;
        leg += 1;
    }
}

/// Coins created by every cache the session has generated.
fn minted_coins(session: &GameSession) -> GameResult<usize> {
    let generator = session.caches().generator();
    let mut total = 0usize;
    for key in session.caches().export_mementos().keys() {
        let cell: Cell = key.parse()?;
        total += generator.initial_coin_count(&cell) as usize;
    }
    Ok(total)
}
