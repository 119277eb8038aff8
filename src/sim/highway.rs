//! Lane racer step
//!
//! The player car sits at the bottom of the road and switches lanes.
//! Enemy cars and road lines scroll down at the current speed and are
//! recycled to the top. Speed rises every `speed_step_distance` of travel.
//! One shot can be in flight at a time.

use glam::Vec2;
use rand::Rng;

use super::collision::{Response, lane_collision, rects_overlap, response_for};
use super::entity::{Body, Entity, EntityKind, IdAllocator, LaneMap, Shape, Vehicle};
use super::score::ScoreTracker;
use super::state::{EntityView, GameOverReason, SimEvent};
use super::tick::{Command, TickInput, TickOutcome};
use crate::config::HighwayConfig;
use crate::random_range;

#[derive(Debug, Clone)]
pub struct HighwayWorld {
    config: HighwayConfig,
    lanes: LaneMap,
    ids: IdAllocator,
    player: Vehicle,
    enemies: Vec<Vehicle>,
    road_lines: Vec<Entity>,
    shot: Option<Entity>,
    /// Current scroll speed
    speed: f32,
    /// Distance at the last speed bump
    ramped_at: f32,
    tracker: ScoreTracker,
}

impl HighwayWorld {
    pub fn new<R: Rng + ?Sized>(config: HighwayConfig, rng: &mut R) -> Self {
        let lanes = LaneMap::new(config.width, config.lane_count, config.lane_margin);
        let mut ids = IdAllocator::default();
        let size = Vec2::new(config.vehicle_width, config.vehicle_height);
        let speed = config.initial_speed();

        let road_lines = spawn_road_lines(&config, speed, &mut ids);

        let enemies = (0..config.enemy_count)
            .map(|i| {
                let lane = lanes.wrapping(i);
                // Stagger lanes one screen apart so they don't arrive together
                let y = -random_range(rng, config.vehicle_height, config.height)
                    - lane.index() as f32 * config.height;
                let mut enemy = Vehicle::new(
                    ids.next_id(),
                    EntityKind::Obstacle,
                    lane,
                    y,
                    size,
                    config.enemy_speed,
                    &lanes,
                );
                enemy.entity_mut().recyclable = true;
                enemy
            })
            .collect();

        let player = Vehicle::new(
            ids.next_id(),
            EntityKind::Player,
            lanes.wrapping(0),
            config.height - config.vehicle_height,
            size,
            0.0,
            &lanes,
        );

        Self {
            config,
            lanes,
            ids,
            player,
            enemies,
            road_lines,
            shot: None,
            speed,
            ramped_at: 0.0,
            tracker: ScoreTracker::new(),
        }
    }

    pub fn player(&self) -> &Vehicle {
        &self.player
    }

    pub fn enemies(&self) -> &[Vehicle] {
        &self.enemies
    }

    pub fn lanes(&self) -> &LaneMap {
        &self.lanes
    }

    pub fn shot(&self) -> Option<&Entity> {
        self.shot.as_ref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn tracker(&self) -> &ScoreTracker {
        &self.tracker
    }

    pub fn views(&self) -> Vec<EntityView> {
        let mut views: Vec<EntityView> = self.road_lines.iter().map(EntityView::of).collect();
        views.extend(
            self.enemies
                .iter()
                .map(|e| EntityView::of(e.entity()).with_lane(e.lane().index())),
        );
        views.extend(self.shot.iter().map(EntityView::of));
        views.push(EntityView::of(self.player.entity()).with_lane(self.player.lane().index()));
        views
    }

    pub fn step<R: Rng + ?Sized>(
        &mut self,
        input: &TickInput,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> TickOutcome {
        if let Some(command) = input.command {
            self.apply_command(command, events);
        }

        // Distance and difficulty
        self.tracker.travel(self.speed);
        if (self.tracker.distance() - self.ramped_at).abs() > self.config.speed_step_distance {
            self.ramped_at = self.tracker.distance();
            self.speed += self.config.speed_increment;
            log::debug!("Highway speed raised to {}", self.speed);
            events.push(SimEvent::SpeedUp(self.speed));
        }

        // Motion: move with last tick's velocity, then adopt the current speed
        let scroll = Vec2::new(0.0, self.speed);
        for enemy in &mut self.enemies {
            enemy.advance();
            enemy.set_velocity(scroll);
        }
        for line in &mut self.road_lines {
            line.advance();
            line.set_velocity(scroll);
        }
        if let Some(shot) = &mut self.shot {
            shot.advance();
        }

        // Shots remove the first enemy they touch
        let target = self.shot.as_ref().and_then(|shot| {
            self.enemies.iter().position(|enemy| {
                response_for(shot.kind, enemy.kind()) == Response::Removal
                    && rects_overlap(shot, enemy.entity())
            })
        });
        if let Some(idx) = target {
            let id = self.enemies[idx].id();
            self.respawn_enemy(idx, rng);
            self.tracker.record_pass();
            self.shot = None;
            events.push(SimEvent::Shot(id));
        }

        let crashed = self.enemies.iter().any(|enemy| {
            response_for(self.player.kind(), enemy.kind()) == Response::Fatal
                && lane_collision(&self.player, enemy)
        });

        // Recycle everything that left through the bottom edge
        let height = self.config.height;
        for idx in 0..self.enemies.len() {
            if self.enemies[idx].pos().y > height {
                let id = self.enemies[idx].id();
                self.tracker.record_pass();
                events.push(SimEvent::Passed(id));
                if self.enemies[idx].entity().recyclable {
                    self.respawn_enemy(idx, rng);
                }
            }
        }
        self.enemies.retain(|e| e.pos().y <= height);
        for line in &mut self.road_lines {
            if line.recyclable && line.pos.y > height {
                line.pos.y = -line.height();
            }
        }
        self.road_lines.retain(|l| l.pos.y <= height);
        // Shots leave through the top and are never recycled
        if self
            .shot
            .as_ref()
            .is_some_and(|s| !s.recyclable && s.pos.y + s.height() < 0.0)
        {
            self.shot = None;
        }

        if crashed {
            TickOutcome::GameOver(GameOverReason::Crash)
        } else {
            TickOutcome::Continue
        }
    }

    fn apply_command(&mut self, command: Command, events: &mut Vec<SimEvent>) {
        match command {
            Command::MoveLeft => {
                if let Some(lane) = self.lanes.left_of(self.player.lane()) {
                    self.player.change_lane(lane, &self.lanes);
                }
            }
            Command::MoveRight => {
                if let Some(lane) = self.lanes.right_of(self.player.lane()) {
                    self.player.change_lane(lane, &self.lanes);
                }
            }
            Command::JumpOrShoot => {
                if self.shot.is_some() {
                    log::debug!("Shot already in flight");
                    return;
                }
                let p = self.player.entity();
                let x = p.pos.x + p.width() / 2.0 - self.config.shot_width / 2.0;
                let pos = Vec2::new(x, p.pos.y);
                let shot = Entity::new(
                    self.ids.next_id(),
                    EntityKind::Projectile,
                    Shape::Rect {
                        width: self.config.shot_width,
                        height: self.config.shot_height,
                    },
                    pos,
                    Vec2::new(0.0, -self.config.shot_speed),
                );
                events.push(SimEvent::Fired(shot.id));
                self.shot = Some(shot);
            }
            Command::Pointer(_) => {}
        }
    }

    /// Send an enemy back above the top edge
    fn respawn_enemy<R: Rng + ?Sized>(&mut self, idx: usize, rng: &mut R) {
        let y = if self.config.random_respawn {
            -random_range(rng, self.config.min_enemy_clearance, self.config.height)
        } else {
            -self.config.vehicle_height
        };
        self.enemies[idx].entity_mut().pos.y = y;
    }
}

fn spawn_road_lines(config: &HighwayConfig, speed: f32, ids: &mut IdAllocator) -> Vec<Entity> {
    if config.road_line_count == 0 {
        return Vec::new();
    }
    let pitch = config.height / config.road_line_count as f32;
    let shape = Shape::Rect {
        width: config.road_line_width,
        height: pitch - config.road_line_spacing,
    };
    let x = config.width / 2.0 - config.road_line_width / 2.0;
    // One extra line so the road stays covered while the last one wraps
    (0..=config.road_line_count)
        .map(|i| {
            Entity::new(
                ids.next_id(),
                EntityKind::Decoration,
                shape,
                Vec2::new(x, i as f32 * pitch),
                Vec2::new(0.0, speed),
            )
            .recyclable()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world_with_single_enemy(
        config: HighwayConfig,
        enemy_lane: u8,
        enemy_y: f32,
    ) -> HighwayWorld {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut world = HighwayWorld::new(config, &mut rng);
        let lane = world.lanes.lane(enemy_lane).unwrap();
        let mut enemy = Vehicle::new(
            world.ids.next_id(),
            EntityKind::Obstacle,
            lane,
            enemy_y,
            Vec2::new(world.config.vehicle_width, world.config.vehicle_height),
            world.config.enemy_speed,
            &world.lanes,
        );
        enemy.entity_mut().recyclable = true;
        world.enemies = vec![enemy];
        world
    }

    #[test]
    fn test_collision_when_extents_overlap() {
        // Road 660 tall puts the player at y = 500
        let config = HighwayConfig {
            height: 660.0,
            enemy_count: 1,
            road_line_count: 0,
            ..Default::default()
        };
        let mut world = world_with_single_enemy(config, 1, 0.0);
        let lane1 = world.lanes.lane(1).unwrap();
        world.player.change_lane(lane1, &world.lanes);
        assert_eq!(world.player.pos().y, 500.0);

        let mut rng = Pcg32::seed_from_u64(2);
        let mut events = Vec::new();
        for _ in 0..100 {
            let outcome = world.step(&TickInput::default(), &mut rng, &mut events);
            let enemy_y = world.enemies[0].pos().y;
            let expected = (500.0 - enemy_y).abs() < 160.0;
            assert_eq!(
                outcome == TickOutcome::GameOver(GameOverReason::Crash),
                expected,
                "enemy at {enemy_y}"
            );
            if expected {
                return;
            }
        }
        panic!("enemy never reached the player");
    }

    #[test]
    fn test_other_lane_never_collides() {
        let config = HighwayConfig {
            enemy_count: 1,
            ..Default::default()
        };
        let mut world = world_with_single_enemy(config, 2, 0.0);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut events = Vec::new();
        for _ in 0..200 {
            let outcome = world.step(&TickInput::default(), &mut rng, &mut events);
            assert_eq!(outcome, TickOutcome::Continue);
        }
        assert!(world.tracker.passed() >= 1);
    }

    #[test]
    fn test_lane_moves_respect_edges() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut world = HighwayWorld::new(HighwayConfig::default(), &mut rng);
        let mut events = Vec::new();
        world.apply_command(Command::MoveLeft, &mut events);
        assert_eq!(world.player.lane().index(), 0);
        for _ in 0..5 {
            world.apply_command(Command::MoveRight, &mut events);
        }
        assert_eq!(world.player.lane().index(), 2);
        assert_eq!(world.player.pos().x, world.lanes.x_for(world.player.lane()));
    }

    #[test]
    fn test_recycled_enemy_scores_once_and_returns_above() {
        let config = HighwayConfig {
            enemy_count: 1,
            road_line_count: 0,
            ..Default::default()
        };
        let height = config.height;
        let mut world = world_with_single_enemy(config, 2, height - 2.0);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut events = Vec::new();
        world.step(&TickInput::default(), &mut rng, &mut events);
        assert_eq!(world.tracker.passed(), 1);
        assert!(world.enemies[0].pos().y <= 0.0);
        assert!(events.iter().any(|e| matches!(e, SimEvent::Passed(_))));

        world.step(&TickInput::default(), &mut rng, &mut events);
        assert_eq!(world.tracker.passed(), 1);
    }

    #[test]
    fn test_non_recyclable_enemy_is_dropped_after_passing() {
        let config = HighwayConfig {
            enemy_count: 1,
            road_line_count: 0,
            ..Default::default()
        };
        let height = config.height;
        let mut world = world_with_single_enemy(config, 2, height - 2.0);
        world.enemies[0].entity_mut().recyclable = false;
        let mut rng = Pcg32::seed_from_u64(4);
        let mut events = Vec::new();
        world.step(&TickInput::default(), &mut rng, &mut events);
        assert_eq!(world.tracker.passed(), 1);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn test_road_lines_wrap_within_one_tick() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut world = HighwayWorld::new(HighwayConfig::default(), &mut rng);
        let mut events = Vec::new();
        for _ in 0..500 {
            world.step(&TickInput::default(), &mut rng, &mut events);
            for line in &world.road_lines {
                assert!(line.pos.y <= world.config.height);
            }
            for enemy in &world.enemies {
                assert!(enemy.pos().y <= world.config.height);
            }
            // Keep the player out of the way
            world.player.change_lane(world.lanes.lane(1).unwrap(), &world.lanes);
            world.enemies.retain(|e| e.lane().index() != 1);
        }
    }

    #[test]
    fn test_speed_ramps_with_distance() {
        let config = HighwayConfig {
            speed_step_distance: 25.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(6);
        let mut world = HighwayWorld::new(config, &mut rng);
        world.enemies.clear();
        let mut events = Vec::new();
        let start = world.speed();
        // 10 + 10 + 10 = 30 > 25 after the third tick
        for _ in 0..3 {
            world.step(&TickInput::default(), &mut rng, &mut events);
        }
        assert_eq!(world.speed(), start + 1.0);
        assert!(events.iter().any(|e| matches!(e, SimEvent::SpeedUp(_))));
        assert!(world.road_lines.iter().all(|l| l.vel.y == world.speed()));
    }

    #[test]
    fn test_single_shot_in_flight() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut world = HighwayWorld::new(HighwayConfig::default(), &mut rng);
        world.enemies.clear();
        let mut events = Vec::new();
        world.step(&TickInput::command(Command::JumpOrShoot), &mut rng, &mut events);
        let first = world.shot().map(|s| s.id);
        assert!(first.is_some());
        world.step(&TickInput::command(Command::JumpOrShoot), &mut rng, &mut events);
        assert_eq!(world.shot().map(|s| s.id), first);

        // Flies off the top and is destroyed
        for _ in 0..40 {
            world.step(&TickInput::default(), &mut rng, &mut events);
        }
        assert!(world.shot().is_none());
    }

    #[test]
    fn test_shot_recycles_enemy_in_path() {
        let config = HighwayConfig {
            enemy_count: 1,
            ..Default::default()
        };
        let mut world = world_with_single_enemy(config, 0, 400.0);
        let mut rng = Pcg32::seed_from_u64(8);
        let mut events = Vec::new();
        for _ in 0..10 {
            world.step(&TickInput::command(Command::JumpOrShoot), &mut rng, &mut events);
        }
        assert!(events.iter().any(|e| matches!(e, SimEvent::Shot(_))));
        assert_eq!(world.tracker.passed(), 1);
        assert!(world.enemies[0].pos().y < 0.0);
    }
}
