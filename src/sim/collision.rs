//! Collision detection and response policy
//!
//! Detection functions only read entity state. Rectangle extents use strict
//! overlap everywhere: edges that merely touch do not collide.

use glam::Vec2;

use super::entity::{Body, Entity, EntityKind, Gate, Vehicle};
use crate::distance;

/// What a detected contact does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Ends the run
    Fatal,
    /// Counts one pass
    Scoring,
    /// Velocity exchange between two free movers
    Elastic,
    /// Shot destroys its target
    Removal,
    /// No effect
    Ignore,
}

/// Response policy for a pair of entity kinds
pub fn response_for(a: EntityKind, b: EntityKind) -> Response {
    use EntityKind::*;
    match (a, b) {
        (Decoration, _) | (_, Decoration) => Response::Ignore,
        (Player, Obstacle) | (Obstacle, Player) => Response::Fatal,
        (Projectile, Obstacle) | (Obstacle, Projectile) => Response::Removal,
        (Obstacle, Obstacle) => Response::Elastic,
        _ => Response::Ignore,
    }
}

/// Circle-circle test; touching circles collide
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    distance(a, b) <= radius_a + radius_b
}

/// Strict overlap of two 1D extents given as (start, length)
#[inline]
pub fn spans_overlap(a_start: f32, a_len: f32, b_start: f32, b_len: f32) -> bool {
    !(a_start + a_len <= b_start || b_start + b_len <= a_start)
}

/// Strict overlap of two axis-aligned rectangles
pub fn rects_overlap(a: &Entity, b: &Entity) -> bool {
    spans_overlap(a.pos.x, a.width(), b.pos.x, b.width())
        && spans_overlap(a.pos.y, a.height(), b.pos.y, b.height())
}

/// Lane band test: same lane and overlapping vertical extents
pub fn lane_collision(a: &Vehicle, b: &Vehicle) -> bool {
    a.lane() == b.lane()
        && spans_overlap(a.pos().y, a.entity().height(), b.pos().y, b.entity().height())
}

/// Relation between the player and a gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateContact {
    /// Not touching the gate
    Clear,
    /// Player is entirely past the gate's trailing edge
    Passed,
    /// Player overlaps a solid part of the gate
    Hit,
}

impl GateContact {
    pub fn response(self) -> Response {
        match self {
            GateContact::Clear => Response::Ignore,
            GateContact::Passed => Response::Scoring,
            GateContact::Hit => Response::Fatal,
        }
    }
}

/// Classify the player against a gate
pub fn gate_contact(player: &Entity, gate: &Gate) -> GateContact {
    let g = gate.entity();
    if player.pos.x > g.pos.x + g.width() {
        return GateContact::Passed;
    }
    if spans_overlap(player.pos.x, player.width(), g.pos.x, g.width()) {
        let above_gap = player.pos.y < gate.gap_y;
        let below_gap = player.pos.y + player.height() > gate.gap_bottom();
        if above_gap || below_gap {
            return GateContact::Hit;
        }
    }
    GateContact::Clear
}

/// Pointer test against a circle; the rim does not count
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    distance(point, center) < radius
}

/// Elastic exchange: swap velocity vectors exactly
#[inline]
pub fn exchange_velocities(a: &mut Entity, b: &mut Entity) {
    std::mem::swap(&mut a.vel, &mut b.vel);
}

/// All unordered index pairs `(i, j)` with `i < j`
pub fn unordered_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}
