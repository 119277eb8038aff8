//! Collision swarm step
//!
//! Roamers bounce off the arena walls and exchange velocities when they
//! touch. The player is the pointer: pressing inside a swattable roamer
//! removes it and counts one point. The swarm never ends by itself.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    Response, circles_overlap, exchange_velocities, point_in_circle, response_for, unordered_pairs,
};
use super::entity::{Body, Entity, EntityKind, IdAllocator, Roamer, Shape};
use super::score::ScoreTracker;
use super::state::{EntityView, SimEvent};
use super::tick::{Command, TickInput, TickOutcome};
use crate::config::SwarmConfig;
use crate::random_range;

#[derive(Debug, Clone)]
pub struct SwarmWorld {
    config: SwarmConfig,
    bounds: Vec2,
    /// Zero-radius circle tracking the last pointer press
    pointer: Entity,
    roamers: Vec<Roamer>,
    tracker: ScoreTracker,
}

impl SwarmWorld {
    pub fn new<R: Rng + ?Sized>(config: SwarmConfig, rng: &mut R) -> Self {
        let mut ids = IdAllocator::default();
        let bounds = Vec2::new(config.width, config.height);
        let margin = config.max_radius;
        let half_knots = config.knots / 2.0;

        let roamers = (0..config.count)
            .map(|_| {
                let center = Vec2::new(
                    random_range(rng, margin, bounds.x - margin),
                    random_range(rng, margin, bounds.y - margin),
                );
                let radius = random_range(rng, config.min_radius, config.max_radius);
                let vel = Vec2::new(
                    random_range(rng, -half_knots, half_knots),
                    random_range(rng, -half_knots, half_knots),
                );
                Roamer::new(ids.next_id(), center, radius, vel)
            })
            .collect();

        let pointer = Entity::new(
            ids.next_id(),
            EntityKind::Player,
            Shape::Circle { radius: 0.0 },
            bounds / 2.0,
            Vec2::ZERO,
        );

        Self {
            config,
            bounds,
            pointer,
            roamers,
            tracker: ScoreTracker::new(),
        }
    }

    pub fn pointer(&self) -> &Entity {
        &self.pointer
    }

    pub fn roamers(&self) -> &[Roamer] {
        &self.roamers
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn views(&self) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = self
            .roamers
            .iter()
            .map(|r| EntityView::of(r.entity()))
            .collect();
        views.push(EntityView::of(&self.pointer));
        views
    }

    pub fn step(&mut self, input: &TickInput, events: &mut Vec<SimEvent>) -> TickOutcome {
        if let Some(Command::Pointer(at)) = input.command {
            self.swat(at, events);
        }

        let travelled: f32 = self.roamers.iter().map(|r| r.entity().vel.length()).sum();
        self.tracker.travel(travelled);

        for roamer in &mut self.roamers {
            roamer.step(self.bounds);
        }

        for (i, j) in unordered_pairs(self.roamers.len()) {
            let (head, tail) = self.roamers.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);
            if response_for(a.kind(), b.kind()) != Response::Elastic {
                continue;
            }
            if !circles_overlap(a.pos(), a.radius(), b.pos(), b.radius()) {
                continue;
            }
            exchange_velocities(a.entity_mut(), b.entity_mut());
            events.push(SimEvent::Flash(a.id()));
            events.push(SimEvent::Flash(b.id()));
            // One extra step to pull the pair apart
            a.step(self.bounds);
            b.step(self.bounds);
        }

        TickOutcome::Continue
    }

    /// Remove every roamer under the pointer
    fn swat(&mut self, at: Vec2, events: &mut Vec<SimEvent>) {
        self.pointer.pos = at;
        if !self.config.preset.swattable() {
            return;
        }
        let tracker = &mut self.tracker;
        self.roamers.retain(|r| {
            let hit = point_in_circle(at, r.pos(), r.radius());
            if hit {
                tracker.record_pass();
                events.push(SimEvent::Swatted(r.id()));
            }
            !hit
        });
    }
}
