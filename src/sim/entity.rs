//! Simulated entities
//!
//! Every moving object shares the [`Entity`] core (id, kind, position,
//! velocity, immutable shape). Variant structs wrap that core with the
//! state their game needs and expose it through the [`Body`] trait:
//! - [`Vehicle`]: lane-constrained rectangle (highway player and enemies)
//! - [`Gate`]: scrolling column with a gap (scroller obstacles)
//! - [`Flyer`]: jumping rectangle (scroller player)
//! - [`Roamer`]: wall-bouncing circle (swarm)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::jump::JumpArc;

/// Stable entity identifier, allocated in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids for one world
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// Bounding shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Centered on the entity position
    Circle { radius: f32 },
    /// Anchored at its top-left corner
    Rect { width: f32, height: f32 },
}

impl Shape {
    /// Axis-aligned size of the shape
    pub fn extent(&self) -> Vec2 {
        match *self {
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
            Shape::Rect { width, height } => Vec2::new(width, height),
        }
    }

    pub fn radius(&self) -> Option<f32> {
        match *self {
            Shape::Circle { radius } => Some(radius),
            Shape::Rect { .. } => None,
        }
    }
}

/// Behavior class of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controlled entity; exactly one per world
    Player,
    /// Fatal to the player, or a scoring gate once passed
    Obstacle,
    /// Cosmetic only, never collides
    Decoration,
    /// Player-fired shot
    Projectile,
}

/// Common physical state
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    shape: Shape,
    /// Repositioned instead of destroyed when it leaves the arena.
    /// Recycle passes check this flag; anything else past its exit is dropped.
    pub recyclable: bool,
}

impl Entity {
    pub fn new(id: EntityId, kind: EntityKind, shape: Shape, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            shape,
            recyclable: false,
        }
    }

    /// Mark as recyclable
    pub fn recyclable(mut self) -> Self {
        self.recyclable = true;
        self
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Apply one tick of velocity, scaled per axis
    #[inline]
    pub fn advance_scaled(&mut self, scale: Vec2) {
        self.pos += self.vel * scale;
    }

    #[inline]
    pub fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.shape.extent().x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.shape.extent().y
    }
}

/// Capability set shared by all entity variants
pub trait Body {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    fn id(&self) -> EntityId {
        self.entity().id
    }

    fn kind(&self) -> EntityKind {
        self.entity().kind
    }

    fn shape(&self) -> Shape {
        self.entity().shape()
    }

    fn pos(&self) -> Vec2 {
        self.entity().pos
    }

    /// Move by one full tick of velocity
    fn advance(&mut self) {
        self.entity_mut().advance_scaled(Vec2::ONE);
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.entity_mut().set_velocity(vel);
    }
}

impl Body for Entity {
    fn entity(&self) -> &Entity {
        self
    }

    fn entity_mut(&mut self) -> &mut Entity {
        self
    }
}

/// Index of a lane; only obtainable through a [`LaneMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Lane(u8);

impl Lane {
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Fixed lane-to-pixel mapping of a road
#[derive(Debug, Clone)]
pub struct LaneMap {
    count: u8,
    lane_width: f32,
    margin: f32,
}

impl LaneMap {
    pub fn new(bound_width: f32, count: u8, margin: f32) -> Self {
        let count = count.max(1);
        Self {
            count,
            lane_width: bound_width / count as f32,
            margin,
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Lane at `index`, if it exists
    pub fn lane(&self, index: u8) -> Option<Lane> {
        (index < self.count).then_some(Lane(index))
    }

    /// Lane for an arbitrary pool index (wraps around)
    pub fn wrapping(&self, index: usize) -> Lane {
        Lane((index % self.count as usize) as u8)
    }

    /// Left edge of a vehicle driving in `lane`
    #[inline]
    pub fn x_for(&self, lane: Lane) -> f32 {
        lane.0 as f32 * self.lane_width + self.margin
    }

    pub fn left_of(&self, lane: Lane) -> Option<Lane> {
        lane.0.checked_sub(1).map(Lane)
    }

    pub fn right_of(&self, lane: Lane) -> Option<Lane> {
        self.lane(lane.0 + 1)
    }
}

/// Lane-constrained rectangle
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    body: Entity,
    lane: Lane,
}

impl Vehicle {
    pub fn new(
        id: EntityId,
        kind: EntityKind,
        lane: Lane,
        y: f32,
        size: Vec2,
        dy: f32,
        lanes: &LaneMap,
    ) -> Self {
        let shape = Shape::Rect {
            width: size.x,
            height: size.y,
        };
        let pos = Vec2::new(lanes.x_for(lane), y);
        Self {
            body: Entity::new(id, kind, shape, pos, Vec2::new(0.0, dy)),
            lane,
        }
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Move to `target` and snap x to its lane position
    pub fn change_lane(&mut self, target: Lane, lanes: &LaneMap) {
        self.lane = target;
        self.body.pos.x = lanes.x_for(target);
    }
}

impl Body for Vehicle {
    fn entity(&self) -> &Entity {
        &self.body
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

/// Full-height scrolling column with an opening
#[derive(Debug, Clone, Serialize)]
pub struct Gate {
    body: Entity,
    /// Top of the opening
    pub gap_y: f32,
    pub gap_height: f32,
    /// Set once the player is past; cleared on recycle
    pub scored: bool,
}

impl Gate {
    pub fn new(id: EntityId, x: f32, size: Vec2, dx: f32, gap_y: f32, gap_height: f32) -> Self {
        let shape = Shape::Rect {
            width: size.x,
            height: size.y,
        };
        Self {
            body: Entity::new(
                id,
                EntityKind::Obstacle,
                shape,
                Vec2::new(x, 0.0),
                Vec2::new(dx, 0.0),
            )
            .recyclable(),
            gap_y,
            gap_height,
            scored: false,
        }
    }

    /// Bottom of the opening
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y + self.gap_height
    }

    /// Re-enter at `x` with a fresh opening
    pub fn recycle(&mut self, x: f32, gap_y: f32) {
        self.body.pos.x = x;
        self.gap_y = gap_y;
        self.scored = false;
    }
}

impl Body for Gate {
    fn entity(&self) -> &Entity {
        &self.body
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

/// Player rectangle driven by a jump arc
#[derive(Debug, Clone, Serialize)]
pub struct Flyer {
    body: Entity,
    pub arc: JumpArc,
}

impl Flyer {
    pub fn new(id: EntityId, pos: Vec2, size: Vec2, dy: f32) -> Self {
        let shape = Shape::Rect {
            width: size.x,
            height: size.y,
        };
        Self {
            body: Entity::new(id, EntityKind::Player, shape, pos, Vec2::new(0.0, dy)),
            arc: JumpArc::default(),
        }
    }
}

impl Body for Flyer {
    fn entity(&self) -> &Entity {
        &self.body
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

/// Free-moving circle confined to the arena by wall bounces
#[derive(Debug, Clone, Serialize)]
pub struct Roamer {
    body: Entity,
}

impl Roamer {
    pub fn new(id: EntityId, center: Vec2, radius: f32, vel: Vec2) -> Self {
        Self {
            body: Entity::new(
                id,
                EntityKind::Obstacle,
                Shape::Circle { radius },
                center,
                vel,
            ),
        }
    }

    pub fn radius(&self) -> f32 {
        self.body.shape().radius().unwrap_or(0.0)
    }

    /// Point velocity back into the arena when touching a wall
    pub fn bounce_within(&mut self, bounds: Vec2) {
        let r = self.radius();
        let e = &mut self.body;
        if e.pos.x - r <= 0.0 {
            e.vel.x = e.vel.x.abs();
        }
        if e.pos.y - r <= 0.0 {
            e.vel.y = e.vel.y.abs();
        }
        if e.pos.x + r >= bounds.x {
            e.vel.x = -e.vel.x.abs();
        }
        if e.pos.y + r >= bounds.y {
            e.vel.y = -e.vel.y.abs();
        }
    }

    /// Bounce, then move one tick
    pub fn step(&mut self, bounds: Vec2) {
        self.bounce_within(bounds);
        self.advance();
    }
}

impl Body for Roamer {
    fn entity(&self) -> &Entity {
        &self.body
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scaled() {
        let mut e = Entity::new(
            EntityId(1),
            EntityKind::Decoration,
            Shape::Rect { width: 1.0, height: 1.0 },
            Vec2::new(10.0, 10.0),
            Vec2::new(2.0, -3.0),
        );
        e.advance_scaled(Vec2::ONE);
        assert_eq!(e.pos, Vec2::new(12.0, 7.0));
        e.advance_scaled(Vec2::new(0.5, 2.0));
        assert_eq!(e.pos, Vec2::new(13.0, 1.0));
    }

    #[test]
    fn test_body_advance_moves_one_tick() {
        let mut e = Entity::new(
            EntityId(2),
            EntityKind::Projectile,
            Shape::Rect { width: 40.0, height: 50.0 },
            Vec2::new(100.0, 700.0),
            Vec2::new(0.0, -30.0),
        );
        e.advance();
        assert_eq!(e.pos, Vec2::new(100.0, 670.0));
        Body::advance(&mut e);
        assert_eq!(e.pos(), Vec2::new(100.0, 640.0));
    }

    #[test]
    fn test_lane_mapping() {
        let lanes = LaneMap::new(480.0, 3, 30.0);
        assert_eq!(lanes.x_for(lanes.lane(0).unwrap()), 30.0);
        assert_eq!(lanes.x_for(lanes.lane(1).unwrap()), 190.0);
        assert_eq!(lanes.x_for(lanes.lane(2).unwrap()), 350.0);
        assert!(lanes.lane(3).is_none());
        assert_eq!(lanes.wrapping(4).index(), 1);
    }

    #[test]
    fn test_lane_edges_are_none() {
        let lanes = LaneMap::new(480.0, 3, 30.0);
        let first = lanes.lane(0).unwrap();
        let last = lanes.lane(2).unwrap();
        assert!(lanes.left_of(first).is_none());
        assert!(lanes.right_of(last).is_none());
        assert_eq!(lanes.right_of(first).map(Lane::index), Some(1));
    }

    #[test]
    fn test_change_lane_recomputes_x() {
        let lanes = LaneMap::new(480.0, 3, 30.0);
        let mut car = Vehicle::new(
            EntityId(1),
            EntityKind::Player,
            lanes.lane(0).unwrap(),
            740.0,
            Vec2::new(130.0, 160.0),
            0.0,
            &lanes,
        );
        car.change_lane(lanes.lane(2).unwrap(), &lanes);
        assert_eq!(car.lane().index(), 2);
        assert_eq!(car.pos(), Vec2::new(350.0, 740.0));
    }

    #[test]
    fn test_roamer_bounces_off_walls() {
        let bounds = Vec2::new(100.0, 100.0);
        let mut r = Roamer::new(EntityId(1), Vec2::new(5.0, 95.0), 5.0, Vec2::new(-3.0, 4.0));
        r.step(bounds);
        assert_eq!(r.entity().vel, Vec2::new(3.0, -4.0));
        assert_eq!(r.pos(), Vec2::new(8.0, 91.0));
    }

    #[test]
    fn test_gate_recycle_resets_score_flag() {
        let mut g = Gate::new(EntityId(3), 768.0, Vec2::new(130.0, 1024.0), -4.5, 200.0, 360.0);
        g.scored = true;
        g.recycle(768.0, 300.0);
        assert!(!g.scored);
        assert_eq!(g.gap_bottom(), 660.0);
        assert!(g.entity().recyclable);
    }
}
