//! Run phases, world container and render views
//!
//! A `World` holds every entity of one run. It is created when a run starts
//! and dropped when the run ends; nothing outside the tick mutates it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityId, EntityKind, Shape};
use super::highway::HighwayWorld;
use super::score::{ScoreMetric, ScoreTracker};
use super::scroller::ScrollerWorld;
use super::swarm::SwarmWorld;
use crate::config::GameConfig;
use crate::heading_degrees;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No active run
    Idle,
    /// One tick per frame
    Running,
    /// Run ended, final score held until restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Player hit an obstacle
    Crash,
    /// Player left the arena
    OutOfBounds,
    /// Ended by the host before a terminal condition
    Abandoned,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Presentation pulse on an entity
    Flash(EntityId),
    /// Obstacle passed without contact
    Passed(EntityId),
    /// Shot fired
    Fired(EntityId),
    /// Obstacle destroyed by a shot
    Shot(EntityId),
    /// Roamer removed by the pointer
    Swatted(EntityId),
    /// Scroll speed raised to the given value
    SpeedUp(f32),
}

/// Everything the presentation layer needs to draw one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Lane index of lane-constrained entities
    pub lane: Option<u8>,
    /// Direction of travel in degrees
    pub heading: f32,
    /// Gate opening as (top, height)
    pub gap: Option<(f32, f32)>,
    pub flashing: bool,
}

impl EntityView {
    pub fn of(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            shape: entity.shape(),
            pos: entity.pos,
            vel: entity.vel,
            lane: None,
            heading: heading_degrees(entity.vel),
            gap: None,
            flashing: false,
        }
    }

    pub fn with_lane(mut self, lane: u8) -> Self {
        self.lane = Some(lane);
        self
    }

    pub fn with_gap(mut self, top: f32, height: f32) -> Self {
        self.gap = Some((top, height));
        self
    }
}

/// All entities of one run, per variant
#[derive(Debug, Clone)]
pub enum World {
    Highway(HighwayWorld),
    Scroller(ScrollerWorld),
    Swarm(SwarmWorld),
}

impl World {
    /// Spawn the entity pools for a fresh run
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        match config {
            GameConfig::Highway(c) => World::Highway(HighwayWorld::new(c.clone(), rng)),
            GameConfig::Scroller(c) => World::Scroller(ScrollerWorld::new(c.clone(), rng)),
            GameConfig::Swarm(c) => World::Swarm(SwarmWorld::new(c.clone(), rng)),
        }
    }

    pub fn tracker(&self) -> &ScoreTracker {
        match self {
            World::Highway(w) => w.tracker(),
            World::Scroller(w) => w.tracker(),
            World::Swarm(w) => w.tracker(),
        }
    }

    /// Counter reported as the run's score
    pub fn metric(&self) -> ScoreMetric {
        match self {
            World::Highway(_) => ScoreMetric::Distance,
            World::Scroller(_) | World::Swarm(_) => ScoreMetric::Passed,
        }
    }

    pub fn score(&self) -> u64 {
        self.tracker().score(self.metric())
    }

    pub fn player(&self) -> &Entity {
        match self {
            World::Highway(w) => w.player().entity(),
            World::Scroller(w) => w.flyer().entity(),
            World::Swarm(w) => w.pointer(),
        }
    }

    /// Render views of every live entity, player last
    pub fn views(&self) -> Vec<EntityView> {
        match self {
            World::Highway(w) => w.views(),
            World::Scroller(w) => w.views(),
            World::Swarm(w) => w.views(),
        }
    }
}
