//! Arcade Sim entry point
//!
//! Native builds run a headless autopilot session of one variant:
//!
//! ```text
//! arcade-sim [highway|scroller|swarm-balls|swarm-ants] [scores.json] [runs] [WIDTHxHEIGHT]
//! ```
//!
//! The web build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_sim::consts::FRAME_RATE;
    use arcade_sim::platform::{HeadlessSurface, autopilot, fit_to_surface, run_frames};
    use arcade_sim::sim::GamePhase;
    use arcade_sim::{Game, GameConfig, InputEvent, JsonFileStore};
    use glam::Vec2;

    // Five minutes of play per run
    const MAX_FRAMES: u64 = FRAME_RATE as u64 * 60 * 5;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let variant = args.next().unwrap_or_else(|| "highway".to_string());
    let scores = args.next().unwrap_or_else(|| "best_scores.json".to_string());
    let runs: u32 = args.next().and_then(|r| r.parse().ok()).unwrap_or(3);
    let size = args.next().and_then(|s| {
        let (w, h) = s.split_once('x')?;
        Some(Vec2::new(w.parse().ok()?, h.parse().ok()?))
    });

    let Some(config) = GameConfig::from_name(&variant) else {
        log::error!("Unknown variant '{variant}' (highway, scroller, swarm-balls, swarm-ants)");
        std::process::exit(2);
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut surface = HeadlessSurface::new(size.unwrap_or_else(|| config.bounds()));
    let config = fit_to_surface(config, &surface);
    let mut game = match Game::new(config, JsonFileStore::new(&scores), seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot create game: {e}");
            std::process::exit(1);
        }
    };

    // Headless: nothing to load
    for name in game.assets().pending() {
        game.asset_loaded(&name);
    }

    log::info!("Arcade Sim (native) starting: {variant}, {runs} run(s), seed {seed}");
    for run in 1..=runs {
        if run > 1 {
            if let Err(e) = game.handle_input(InputEvent::Restart) {
                log::error!("Restart failed: {e}");
                break;
            }
        }
        let stats = run_frames(&mut game, &mut surface, MAX_FRAMES, autopilot::next_input);
        if stats.phase == GamePhase::Running {
            // Out of frames; swarm runs always end here
            game.abandon();
        }
        let snap = game.state();
        log::info!(
            "Run {run}: {:?} after {} frames, score {} (distance {:.0}, passed {}), best {:?}{}",
            stats.phase,
            stats.frames,
            snap.score,
            snap.distance,
            snap.passed,
            snap.best_score,
            if snap.new_best { " NEW BEST" } else { "" }
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
