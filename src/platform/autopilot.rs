//! Scripted player for demos and soak tests

use glam::Vec2;

use crate::best_score::BestScoreStore;
use crate::game::{Game, InputEvent};
use crate::sim::{Body, GamePhase, HighwayWorld, ScrollerWorld, SwarmWorld, World};

/// How far ahead (in vehicle heights) the highway pilot looks
const LOOKAHEAD: f32 = 2.5;

/// Next input for `game`: start when idle, then play the active variant
pub fn next_input<S: BestScoreStore>(game: &Game<S>) -> Option<InputEvent> {
    match game.phase() {
        GamePhase::Idle => Some(InputEvent::Start),
        GamePhase::GameOver => None,
        GamePhase::Running => game.world().and_then(steer),
    }
}

pub fn steer(world: &World) -> Option<InputEvent> {
    match world {
        World::Highway(w) => steer_highway(w),
        World::Scroller(w) => steer_scroller(w),
        World::Swarm(w) => steer_swarm(w),
    }
}

/// Dodge into a free lane, otherwise keep shooting
fn steer_highway(world: &HighwayWorld) -> Option<InputEvent> {
    let player = world.player();
    let py = player.pos().y;
    let reach = player.entity().height() * LOOKAHEAD;
    let threatened = |lane: u8| {
        world.enemies().iter().any(|e| {
            e.lane().index() == lane && e.pos().y < py + reach && e.pos().y > py - reach
        })
    };

    let lane = player.lane();
    if !threatened(lane.index()) {
        return Some(InputEvent::JumpOrShoot);
    }
    let lanes = world.lanes();
    if let Some(left) = lanes.left_of(lane).filter(|l| !threatened(l.index())) {
        log::trace!("Dodging left into lane {}", left.index());
        return Some(InputEvent::MoveLeft);
    }
    if lanes.right_of(lane).is_some_and(|l| !threatened(l.index())) {
        return Some(InputEvent::MoveRight);
    }
    Some(InputEvent::JumpOrShoot)
}

/// Jump whenever the flyer sinks below the middle of the next opening
fn steer_scroller(world: &ScrollerWorld) -> Option<InputEvent> {
    let flyer = world.flyer().entity();
    let next = world
        .gates()
        .iter()
        .filter(|g| !g.scored)
        .min_by(|a, b| a.pos().x.total_cmp(&b.pos().x))?;
    let target = next.gap_y + next.gap_height * 0.6;
    let falling = flyer.vel.y > 0.0;
    (falling && flyer.pos.y + flyer.height() > target && !world.flyer().arc.is_hanging())
        .then_some(InputEvent::JumpOrShoot)
}

/// Press on the first roamer
fn steer_swarm(world: &SwarmWorld) -> Option<InputEvent> {
    let Vec2 { x, y } = world.roamers().first()?.pos();
    Some(InputEvent::Pointer { x, y })
}
