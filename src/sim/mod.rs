//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod entity;
pub mod highway;
pub mod jump;
pub mod score;
pub mod scroller;
pub mod state;
pub mod swarm;
pub mod tick;

pub use collision::{
    GateContact, Response, circles_overlap, exchange_velocities, gate_contact, lane_collision,
    point_in_circle, rects_overlap, response_for, spans_overlap,
};
pub use effects::Effects;
pub use entity::{
    Body, Entity, EntityId, EntityKind, Flyer, Gate, Lane, LaneMap, Roamer, Shape, Vehicle,
};
pub use highway::HighwayWorld;
pub use jump::{ArcPhase, JumpArc};
pub use score::{ScoreMetric, ScoreTracker};
pub use scroller::ScrollerWorld;
pub use state::{EntityView, GameOverReason, GamePhase, SimEvent, World};
pub use swarm::SwarmWorld;
pub use tick::{Command, TickInput, TickOutcome, TickReport, tick};
