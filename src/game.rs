//! Game controller
//!
//! Owns the phase machine (Idle → Running → GameOver → Running), buffers
//! the latest input for the next tick, gates the first start on assets and
//! keeps the best score in sync with its store.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::assets::AssetGate;
use crate::best_score::BestScoreStore;
use crate::config::GameConfig;
use crate::consts::FLASH_TICKS;
use crate::error::GameError;
use crate::sim::{
    Command, Effects, EntityView, GameOverReason, GamePhase, ScoreTracker, SimEvent, TickInput,
    TickOutcome, World, tick,
};

/// Input from the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    JumpOrShoot,
    Start,
    Restart,
    /// Pointer press in arena coordinates
    Pointer { x: f32, y: f32 },
}

impl InputEvent {
    /// Gameplay command carried by this event, if any
    fn command(self) -> Option<Command> {
        match self {
            InputEvent::MoveLeft => Some(Command::MoveLeft),
            InputEvent::MoveRight => Some(Command::MoveRight),
            InputEvent::JumpOrShoot => Some(Command::JumpOrShoot),
            InputEvent::Pointer { x, y } => Some(Command::Pointer(Vec2::new(x, y))),
            InputEvent::Start | InputEvent::Restart => None,
        }
    }
}

/// Read-only view of the game for presentation
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    /// Headline score of the current or last run
    pub score: u64,
    pub distance: f32,
    pub passed: u32,
    pub best_score: Option<u64>,
    /// Last run beat the stored best
    pub new_best: bool,
    /// Why the last run ended
    pub reason: Option<GameOverReason>,
    pub entities: Vec<EntityView>,
}

/// Final counters of a finished run
#[derive(Debug, Clone)]
struct RunSummary {
    tracker: ScoreTracker,
    score: u64,
    reason: GameOverReason,
}

pub struct Game<S: BestScoreStore> {
    config: GameConfig,
    store: S,
    seed: u64,
    runs: u64,
    phase: GamePhase,
    world: Option<World>,
    rng: Pcg32,
    pending: Option<Command>,
    effects: Effects,
    assets: AssetGate,
    best_score: Option<u64>,
    new_best: bool,
    last_run: Option<RunSummary>,
    frame: u64,
}

impl<S: BestScoreStore> Game<S> {
    /// Validate `config` and load the stored best score
    pub fn new(config: GameConfig, store: S, seed: u64) -> Result<Self, GameError> {
        config.validate()?;
        let assets = AssetGate::for_config(&config);
        let mut game = Self {
            config,
            store,
            seed,
            runs: 0,
            phase: GamePhase::Idle,
            world: None,
            rng: Pcg32::seed_from_u64(seed),
            pending: None,
            effects: Effects::new(),
            assets,
            best_score: None,
            new_best: false,
            last_run: None,
            frame: 0,
        };
        game.best_score = game.read_best();
        log::info!(
            "{} ready (seed {seed}, best {:?})",
            game.config.name(),
            game.best_score
        );
        Ok(game)
    }

    /// Replace the asset requirements
    pub fn with_asset_gate(mut self, assets: AssetGate) -> Self {
        self.assets = assets;
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn assets(&self) -> &AssetGate {
        &self.assets
    }

    /// World of the active run
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report a resolved asset
    pub fn asset_loaded(&mut self, name: &str) -> bool {
        let known = self.assets.mark_loaded(name);
        if self.assets.is_ready() {
            log::info!("All assets loaded");
        }
        known
    }

    /// Begin a fresh run from Idle or GameOver
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.phase == GamePhase::Running {
            log::debug!("Start ignored: run already in progress");
            return Ok(());
        }
        if !self.assets.is_ready() {
            return Err(GameError::AssetsPending(self.assets.pending()));
        }

        self.best_score = self.read_best();
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.runs));
        self.runs += 1;
        self.world = Some(World::new(&self.config, &mut self.rng));
        self.pending = None;
        self.effects.clear();
        self.new_best = false;
        self.last_run = None;
        self.phase = GamePhase::Running;
        log::info!("Run {} started ({})", self.runs, self.config.name());
        Ok(())
    }

    /// Route a platform input according to the current phase
    pub fn handle_input(&mut self, event: InputEvent) -> Result<(), GameError> {
        match (self.phase, event) {
            (GamePhase::Idle, InputEvent::Start) | (GamePhase::GameOver, InputEvent::Restart) => {
                self.start()
            }
            (GamePhase::Running, event) => {
                match event.command() {
                    // Latest command wins
                    Some(command) => self.pending = Some(command),
                    None => log::debug!("{event:?} ignored while running"),
                }
                Ok(())
            }
            (phase, event) => {
                log::debug!("{event:?} ignored in {phase:?}");
                Ok(())
            }
        }
    }

    /// Advance one frame. Only Running advances the world.
    pub fn tick(&mut self) -> GamePhase {
        if self.phase != GamePhase::Running {
            return self.phase;
        }
        let Some(world) = self.world.as_mut() else {
            return self.phase;
        };

        self.frame += 1;
        self.effects.expire();
        let input = TickInput {
            command: self.pending.take(),
        };
        let report = tick(world, &input, &mut self.rng);

        for event in &report.events {
            match *event {
                SimEvent::Flash(id) => self.effects.flash(id, FLASH_TICKS),
                SimEvent::SpeedUp(speed) => log::debug!("Speed raised to {speed}"),
                _ => {}
            }
        }

        if let TickOutcome::GameOver(reason) = report.outcome {
            self.finish_run(reason);
        }
        self.phase
    }

    /// End the active run now, settling the best score as if it had ended
    /// on its own. Swarm runs never end by themselves, so hosts use this.
    pub fn abandon(&mut self) {
        if self.phase != GamePhase::Running {
            log::debug!("Abandon ignored in {:?}", self.phase);
            return;
        }
        self.finish_run(GameOverReason::Abandoned);
    }

    /// Tear the world down and settle the best score
    fn finish_run(&mut self, reason: GameOverReason) {
        let Some(world) = self.world.take() else {
            return;
        };
        let score = world.score();
        self.effects.clear();
        self.pending = None;
        self.phase = GamePhase::GameOver;

        if score > self.best_score.unwrap_or(0) {
            self.new_best = true;
            self.best_score = Some(score);
            if let Err(e) = self.store.set_best_score(self.config.best_score_key(), score) {
                log::warn!("Failed to save best score: {e}");
            }
        }

        log::info!(
            "Game over ({reason:?}) after {} frames: score {score}, best {:?}",
            self.frame,
            self.best_score
        );
        self.last_run = Some(RunSummary {
            tracker: world.tracker().clone(),
            score,
            reason,
        });
        self.frame = 0;
    }

    fn read_best(&self) -> Option<u64> {
        match self.store.best_score(self.config.best_score_key()) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Best score unavailable: {e}");
                None
            }
        }
    }

    /// Snapshot for the presentation layer
    pub fn state(&self) -> GameSnapshot {
        let (tracker, score, reason) = match (&self.world, &self.last_run) {
            (Some(world), _) => (world.tracker().clone(), world.score(), None),
            (None, Some(run)) => (run.tracker.clone(), run.score, Some(run.reason)),
            (None, None) => (ScoreTracker::new(), 0, None),
        };
        let entities = self
            .world
            .as_ref()
            .map(|world| {
                world
                    .views()
                    .into_iter()
                    .map(|mut view| {
                        view.flashing = self.effects.is_flashing(view.id);
                        view
                    })
                    .collect()
            })
            .unwrap_or_default();

        GameSnapshot {
            phase: self.phase,
            score,
            distance: tracker.distance(),
            passed: tracker.passed(),
            best_score: self.best_score,
            new_best: self.new_best,
            reason,
            entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::best_score::MemoryStore;
    use crate::config::{HighwayConfig, ScrollerConfig, SwarmConfig, SwarmPreset};
    use crate::error::{ConfigError, PersistenceError};
    use crate::sim::Body;

    fn scroller_game(store: MemoryStore) -> Game<MemoryStore> {
        Game::new(GameConfig::Scroller(ScrollerConfig::default()), store, 7)
            .unwrap()
            .with_asset_gate(AssetGate::ready())
    }

    /// Tick until the run ends, returning the number of ticks taken
    fn run_to_game_over<S: BestScoreStore>(game: &mut Game<S>) -> usize {
        for i in 1..=10_000 {
            if game.tick() == GamePhase::GameOver {
                return i;
            }
        }
        panic!("run never ended");
    }

    struct FailingStore;

    impl BestScoreStore for FailingStore {
        fn best_score(&self, _key: &str) -> Result<Option<u64>, PersistenceError> {
            Err(PersistenceError::Unavailable("offline".to_string()))
        }

        fn set_best_score(&mut self, _key: &str, _score: u64) -> Result<(), PersistenceError> {
            Err(PersistenceError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::Highway(HighwayConfig {
            lane_count: 0,
            ..Default::default()
        });
        let err = Game::new(config, MemoryStore::new(), 1).err().unwrap();
        assert!(matches!(err, GameError::Config(ConfigError::ZeroLanes)));
    }

    #[test]
    fn test_start_waits_for_assets() {
        let mut game = Game::new(
            GameConfig::Highway(HighwayConfig::default()),
            MemoryStore::new(),
            1,
        )
        .unwrap();
        assert!(matches!(game.start(), Err(GameError::AssetsPending(p)) if p.len() == 3));
        assert_eq!(game.phase(), GamePhase::Idle);

        for name in game.assets().pending() {
            game.asset_loaded(&name);
        }
        game.start().unwrap();
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_phase_machine() {
        let mut game = scroller_game(MemoryStore::new());
        assert_eq!(game.tick(), GamePhase::Idle);
        assert!(game.state().entities.is_empty());

        // Restart is not valid from Idle
        game.handle_input(InputEvent::Restart).unwrap();
        assert_eq!(game.phase(), GamePhase::Idle);

        game.handle_input(InputEvent::Start).unwrap();
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(!game.state().entities.is_empty());

        run_to_game_over(&mut game);
        let snap = game.state();
        assert_eq!(snap.phase, GamePhase::GameOver);
        assert_eq!(snap.reason, Some(GameOverReason::OutOfBounds));
        assert!(snap.entities.is_empty());
        assert!(snap.distance > 0.0);

        // Ticks in GameOver change nothing
        assert_eq!(game.tick(), GamePhase::GameOver);
        game.handle_input(InputEvent::Start).unwrap();
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.handle_input(InputEvent::Restart).unwrap();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.state().distance, 0.0);
    }

    #[test]
    fn test_gameplay_input_ignored_outside_running() {
        let mut game = scroller_game(MemoryStore::new());
        game.handle_input(InputEvent::JumpOrShoot).unwrap();
        assert_eq!(game.pending, None);
        game.start().unwrap();
        game.handle_input(InputEvent::MoveLeft).unwrap();
        game.handle_input(InputEvent::JumpOrShoot).unwrap();
        assert_eq!(game.pending, Some(Command::JumpOrShoot));
        game.tick();
        assert_eq!(game.pending, None);
    }

    #[test]
    fn test_best_score_updates_only_when_beaten() {
        let mut store = MemoryStore::new();
        store.set_best_score("@BEST_SCORE", 50).unwrap();
        let mut game = Game::new(GameConfig::Highway(HighwayConfig::default()), store, 3)
            .unwrap()
            .with_asset_gate(AssetGate::ready());
        assert_eq!(game.state().best_score, Some(50));

        game.start().unwrap();
        run_to_game_over(&mut game);
        let snap = game.state();
        // Highway distance grows by at least the initial speed every tick
        assert!(snap.score > 50);
        assert!(snap.new_best);
        assert_eq!(snap.best_score, Some(snap.score));
        assert_eq!(
            game.store().best_score("@BEST_SCORE").unwrap(),
            Some(snap.score)
        );
    }

    #[test]
    fn test_zero_score_is_not_a_best() {
        let mut game = scroller_game(MemoryStore::new());
        game.start().unwrap();
        run_to_game_over(&mut game);
        let snap = game.state();
        assert_eq!(snap.score, 0);
        assert!(!snap.new_best);
        assert_eq!(game.store().best_score("@BEST_SCORE_KEY").unwrap(), None);
    }

    #[test]
    fn test_failing_store_is_not_fatal() {
        let mut game = Game::new(
            GameConfig::Scroller(ScrollerConfig::default()),
            FailingStore,
            9,
        )
        .unwrap()
        .with_asset_gate(AssetGate::ready());
        assert_eq!(game.state().best_score, None);
        game.start().unwrap();
        game.pending = Some(Command::JumpOrShoot);
        run_to_game_over(&mut game);
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_abandoned_swarm_run_settles_and_restarts() {
        let config = GameConfig::Swarm(SwarmConfig::from_preset(SwarmPreset::Ants));
        let mut game = Game::new(config, MemoryStore::new(), 12)
            .unwrap()
            .with_asset_gate(AssetGate::ready());

        // Abandon outside a run is a no-op
        game.abandon();
        assert_eq!(game.phase(), GamePhase::Idle);

        game.start().unwrap();
        for _ in 0..10 {
            game.tick();
        }
        let target = match game.world() {
            Some(World::Swarm(w)) => w.roamers()[0].pos(),
            _ => panic!("expected a swarm world"),
        };
        game.handle_input(InputEvent::Pointer {
            x: target.x,
            y: target.y,
        })
        .unwrap();
        game.tick();
        let first = game.state();
        assert!(first.passed > 0);
        assert!(first.distance > 0.0);

        game.abandon();
        let settled = game.state();
        assert_eq!(settled.phase, GamePhase::GameOver);
        assert_eq!(settled.reason, Some(GameOverReason::Abandoned));
        assert!(settled.new_best);
        assert_eq!(
            game.store().best_score("@BEST_SCORE_SWARM").unwrap(),
            Some(first.score)
        );

        game.handle_input(InputEvent::Restart).unwrap();
        let second = game.state();
        assert_eq!(second.phase, GamePhase::Running);
        assert_eq!(second.distance, 0.0);
        assert_eq!(second.passed, 0);
    }

    #[test]
    fn test_restart_is_reproducible() {
        let mut a = scroller_game(MemoryStore::new());
        let mut b = scroller_game(MemoryStore::new());
        a.start().unwrap();
        b.start().unwrap();
        for _ in 0..20 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.state().entities, b.state().entities);
    }

    #[test]
    fn test_flashes_follow_collisions_and_clear() {
        let mut game = Game::new(
            GameConfig::Swarm(SwarmConfig::default()),
            MemoryStore::new(),
            5,
        )
        .unwrap();
        game.start().unwrap();
        let mut saw_flash = false;
        for _ in 0..120 {
            game.tick();
            if game.state().entities.iter().any(|e| e.flashing) {
                saw_flash = true;
                break;
            }
        }
        // 100 balls in a small arena always touch within two seconds
        assert!(saw_flash);
        assert!(!game.effects.is_empty());
        game.finish_run(GameOverReason::Crash);
        assert!(game.effects.is_empty());
        assert_eq!(game.phase(), GamePhase::GameOver);
    }
}
