//! Single simulation tick
//!
//! Advances a world by exactly one frame. Per tick, in order:
//! 1. derived state (distance, difficulty)
//! 2. entity motion
//! 3. collision detection
//! 4. collision responses
//! 5. recycling of entities that left the arena
//! 6. terminal check

use glam::Vec2;
use rand::Rng;

use super::state::{GameOverReason, SimEvent, World};

/// Gameplay command consumed by a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Jump (scroller) or fire (highway)
    JumpOrShoot,
    /// Pointer press at an arena position (swarm)
    Pointer(Vec2),
}

/// Input for a single tick; at most one buffered command
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub command: Option<Command>,
}

impl TickInput {
    pub fn command(command: Command) -> Self {
        Self {
            command: Some(command),
        }
    }
}

/// Whether the run continues after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    GameOver(GameOverReason),
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub outcome: TickOutcome,
    pub events: Vec<SimEvent>,
}

/// Advance the world by one tick
pub fn tick<R: Rng + ?Sized>(world: &mut World, input: &TickInput, rng: &mut R) -> TickReport {
    let mut events = Vec::new();
    let outcome = match world {
        World::Highway(w) => w.step(input, rng, &mut events),
        World::Scroller(w) => w.step(input, rng, &mut events),
        World::Swarm(w) => w.step(input, &mut events),
    };
    TickReport { outcome, events }
}
