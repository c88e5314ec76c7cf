//! Teleport Arena entry point
//!
//! Native: runs a scripted headless session on a virtual clock and prints
//! the session stats. The web build is driven from JS through
//! `platform::web::WebArena`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use teleport_arena::platform::{Clock, ManualClock};
    use teleport_arena::sim::{PadSet, SimEvent};
    use teleport_arena::{Arena, SimConfig};

    env_logger::init();
    log::info!("Teleport Arena (native) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path, e);
                SimConfig::default()
            }
        },
        None => SimConfig::default(),
    };

    let clock = ManualClock::new(0.0);
    let mut arena = match Arena::new(config, PadSet::default_layout(), clock.now_ms()) {
        Ok(arena) => arena,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(1);
        }
    };

    // (keys held, duration in ms)
    let script: &[(&[&str], f64)] = &[
        (&[], 1000.0),
        (&["a"], 1500.0),
        (&["w"], 300.0),
        (&["a"], 800.0),
        (&["w", "d"], 2500.0),
        (&[], 5000.0),
        (&["s"], 1200.0),
    ];

    const FRAME_MS: f64 = 1000.0 / 60.0;
    for (keys, duration) in script {
        for key in *keys {
            arena.key_down(key);
        }
        let end = clock.now_ms() + duration;
        while clock.now_ms() < end {
            clock.advance(FRAME_MS);
            for event in arena.frame(clock.now_ms()) {
                if let SimEvent::TeleportStarted { source, target } = event {
                    println!("{:>7.0}ms  {} -> {}", clock.now_ms(), source, target);
                }
            }
        }
        arena.release_all();
    }

    let snapshot = arena.snapshot(clock.now_ms());
    match serde_json::to_string_pretty(&snapshot.stats) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not serialize stats: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
