//! Platform abstraction layer
//!
//! Handles the seams between the simulation and its host:
//! - Rendering surface (anything that can draw an [`EntityView`])
//! - Frame driving (one `Game::tick` per frame)
//! - Browser bindings on wasm32

pub mod autopilot;

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;

use crate::best_score::BestScoreStore;
use crate::config::GameConfig;
use crate::game::{Game, GameSnapshot, InputEvent};
use crate::sim::{EntityView, GamePhase};

/// Drawing target for one frame of entities
pub trait Surface {
    /// Arena size the surface displays
    fn bounds(&self) -> Vec2;

    /// Start a new frame
    fn clear(&mut self);

    fn present(&mut self, view: &EntityView);
}

/// Surface that only remembers the last frame
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    bounds: Vec2,
    frame: Vec<EntityView>,
    frames: u64,
}

impl HeadlessSurface {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            bounds,
            frame: Vec::new(),
            frames: 0,
        }
    }

    /// Entities presented since the last clear
    pub fn frame(&self) -> &[EntityView] {
        &self.frame
    }

    /// Number of frames started
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Surface for HeadlessSurface {
    fn bounds(&self) -> Vec2 {
        self.bounds
    }

    fn clear(&mut self) {
        self.frame.clear();
        self.frames += 1;
    }

    fn present(&mut self, view: &EntityView) {
        self.frame.push(view.clone());
    }
}

/// Resize `config` to the arena a surface displays
pub fn fit_to_surface(config: GameConfig, surface: &impl Surface) -> GameConfig {
    let bounds = surface.bounds();
    if bounds != config.bounds() {
        log::info!("Arena resized to {}x{}", bounds.x, bounds.y);
    }
    config.with_bounds(bounds)
}

/// Draw a snapshot, player last
pub fn present_frame(surface: &mut impl Surface, snapshot: &GameSnapshot) {
    surface.clear();
    for view in &snapshot.entities {
        surface.present(view);
    }
}

/// Outcome of a driven session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub phase: GamePhase,
}

/// Drive `game` for up to `max_frames`, asking `driver` for input each frame.
/// Stops at the first GameOver.
pub fn run_frames<S, F>(
    game: &mut Game<S>,
    surface: &mut impl Surface,
    max_frames: u64,
    mut driver: F,
) -> RunStats
where
    S: BestScoreStore,
    F: FnMut(&Game<S>) -> Option<InputEvent>,
{
    let mut frames = 0;
    while frames < max_frames {
        if let Some(event) = driver(game) {
            if let Err(e) = game.handle_input(event) {
                log::warn!("Input {event:?} rejected: {e}");
            }
        }
        let phase = game.tick();
        frames += 1;
        present_frame(surface, &game.state());
        if phase == GamePhase::GameOver {
            break;
        }
    }
    RunStats {
        frames,
        phase: game.phase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetGate;
    use crate::best_score::MemoryStore;
    use crate::config::{HighwayConfig, ScrollerConfig};
    use crate::sim::EntityKind;

    #[test]
    fn test_headless_run_presents_player_last() {
        let config = GameConfig::Scroller(ScrollerConfig::default());
        let mut surface = HeadlessSurface::new(config.bounds());
        let mut game = Game::new(config, MemoryStore::new(), 21)
            .unwrap()
            .with_asset_gate(AssetGate::ready());
        game.start().unwrap();

        let stats = run_frames(&mut game, &mut surface, 5, |_| None);
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.phase, GamePhase::Running);
        assert_eq!(surface.frames(), 5);
        assert_eq!(surface.frame().len(), 3);
        assert_eq!(surface.frame().last().map(|v| v.kind), Some(EntityKind::Player));
    }

    #[test]
    fn test_config_fits_surface() {
        let surface = HeadlessSurface::new(Vec2::new(600.0, 1200.0));
        let config = fit_to_surface(GameConfig::Highway(HighwayConfig::default()), &surface);
        assert_eq!(config.bounds(), surface.bounds());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_run_stops_at_game_over() {
        let config = GameConfig::Scroller(ScrollerConfig::default());
        let mut surface = HeadlessSurface::new(config.bounds());
        let mut game = Game::new(config, MemoryStore::new(), 22)
            .unwrap()
            .with_asset_gate(AssetGate::ready());
        game.start().unwrap();

        let stats = run_frames(&mut game, &mut surface, 1_000, |_| None);
        assert_eq!(stats.phase, GamePhase::GameOver);
        assert!(stats.frames < 1_000);
        // World is gone once the run ends
        assert!(surface.frame().is_empty());
    }
}
