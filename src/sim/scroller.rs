//! Side scroller step
//!
//! The flyer stays at a fixed x and moves only vertically along its jump
//! arc. Gates scroll left and re-enter from the right edge with a new
//! opening. Touching the floor or a solid part of a gate ends the run.

use glam::Vec2;
use rand::Rng;

use super::collision::{GateContact, Response, gate_contact};
use super::entity::{Body, Flyer, Gate, IdAllocator};
use super::score::ScoreTracker;
use super::state::{EntityView, GameOverReason, SimEvent};
use super::tick::{Command, TickInput, TickOutcome};
use crate::config::ScrollerConfig;
use crate::random_range;

#[derive(Debug, Clone)]
pub struct ScrollerWorld {
    config: ScrollerConfig,
    flyer: Flyer,
    gates: Vec<Gate>,
    tracker: ScoreTracker,
}

impl ScrollerWorld {
    pub fn new<R: Rng + ?Sized>(config: ScrollerConfig, rng: &mut R) -> Self {
        let mut ids = IdAllocator::default();
        let gate_size = Vec2::new(config.gate_width, config.height);
        let (gap_min, gap_max) = config.gap_range();

        let gates = (0..config.gate_count)
            .map(|i| {
                Gate::new(
                    ids.next_id(),
                    config.width + i as f32 * config.gate_spacing,
                    gate_size,
                    config.scroll_dx,
                    random_range(rng, gap_min, gap_max),
                    config.gap_height,
                )
            })
            .collect();

        let flyer = Flyer::new(
            ids.next_id(),
            config.flyer_start(),
            Vec2::new(config.flyer_width, config.flyer_height),
            config.default_dy,
        );

        Self {
            config,
            flyer,
            gates,
            tracker: ScoreTracker::new(),
        }
    }

    pub fn flyer(&self) -> &Flyer {
        &self.flyer
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn views(&self) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = self
            .gates
            .iter()
            .map(|g| EntityView::of(g.entity()).with_gap(g.gap_y, g.gap_height))
            .collect();
        views.push(EntityView::of(self.flyer.entity()));
        views
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        input: &TickInput,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> TickOutcome {
        if input.command == Some(Command::JumpOrShoot) {
            let flyer = &mut self.flyer;
            let mut dy = flyer.entity().vel.y;
            if flyer.arc.trigger(&mut dy, &self.config.jump) {
                flyer.entity_mut().vel.y = dy;
            } else {
                log::debug!("Jump ignored while hanging");
            }
        }

        self.tracker.travel(self.config.scroll_dx);

        // Player: jump arc, then floor and ceiling
        let mut dy = self.flyer.entity().vel.y;
        self.flyer.arc.step(&mut dy, &self.config.jump);
        self.flyer.entity_mut().vel.y = dy;
        self.flyer.advance();

        let player = self.flyer.entity();
        let out_of_bounds = player.pos.y + player.height() >= self.config.height;
        if player.pos.y <= 0.0 {
            self.flyer.entity_mut().vel.y = self.config.default_dy;
        }

        for gate in &mut self.gates {
            gate.advance();
        }

        // Gates already passed can neither score again nor kill
        let mut crashed = false;
        for gate in self.gates.iter_mut().filter(|g| !g.scored) {
            let contact = gate_contact(self.flyer.entity(), gate);
            match contact.response() {
                Response::Scoring => {
                    gate.scored = true;
                    self.tracker.record_pass();
                    events.push(SimEvent::Passed(gate.id()));
                }
                Response::Fatal => crashed = true,
                _ => debug_assert_eq!(contact, GateContact::Clear),
            }
        }

        let (gap_min, gap_max) = self.config.gap_range();
        for gate in &mut self.gates {
            let g = gate.entity();
            if g.recyclable && g.pos.x + g.width() < 0.0 {
                gate.recycle(self.config.width, random_range(rng, gap_min, gap_max));
            }
        }
        self.gates.retain(|g| g.pos().x + g.entity().width() >= 0.0);

        if crashed {
            TickOutcome::GameOver(GameOverReason::Crash)
        } else if out_of_bounds {
            TickOutcome::GameOver(GameOverReason::OutOfBounds)
        } else {
            TickOutcome::Continue
        }
    }
}
