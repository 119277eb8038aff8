//! Variant configuration
//!
//! Every tunable of the three arcade variants lives here. Defaults match the
//! shipped games; a config can also be loaded from JSON and is validated
//! before a `Game` accepts it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Swarm population presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SwarmPreset {
    /// Many small colored balls
    #[default]
    Balls,
    /// A few large ants that can be swatted
    Ants,
}

impl SwarmPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwarmPreset::Balls => "Balls",
            SwarmPreset::Ants => "Ants",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "balls" | "ball" => Some(SwarmPreset::Balls),
            "ants" | "ant" => Some(SwarmPreset::Ants),
            _ => None,
        }
    }

    /// Population size for this preset
    pub fn count(&self) -> usize {
        match self {
            SwarmPreset::Balls => BALL_COUNT,
            SwarmPreset::Ants => ANT_COUNT,
        }
    }

    /// Radius range `(min, max)`; ants are all the same size
    pub fn radius_range(&self) -> (f32, f32) {
        match self {
            SwarmPreset::Balls => (BALL_MIN_RADIUS, BALL_MAX_RADIUS),
            SwarmPreset::Ants => (ANT_RADIUS, ANT_RADIUS),
        }
    }

    /// Whether the pointer can swat roamers
    pub fn swattable(&self) -> bool {
        matches!(self, SwarmPreset::Ants)
    }
}

/// Lane racer tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighwayConfig {
    pub width: f32,
    pub height: f32,
    pub lane_count: u8,
    /// Left inset of a vehicle inside its lane
    pub lane_margin: f32,
    pub vehicle_width: f32,
    pub vehicle_height: f32,
    pub enemy_count: usize,
    /// Enemy speed on the first tick; also seeds the scroll speed
    pub enemy_speed: f32,
    /// Minimum distance above the top edge a recycled enemy restarts at
    pub min_enemy_clearance: f32,
    /// Randomize enemy re-entry height
    pub random_respawn: bool,
    pub speed_step_distance: f32,
    pub speed_increment: f32,
    pub road_line_count: usize,
    pub road_line_width: f32,
    pub road_line_spacing: f32,
    pub shot_width: f32,
    pub shot_height: f32,
    pub shot_speed: f32,
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            width: HIGHWAY_WIDTH,
            height: HIGHWAY_HEIGHT,
            lane_count: LANE_COUNT,
            lane_margin: LANE_MARGIN,
            vehicle_width: VEHICLE_WIDTH,
            vehicle_height: VEHICLE_HEIGHT,
            enemy_count: ENEMY_COUNT,
            enemy_speed: ENEMY_SPEED,
            min_enemy_clearance: VEHICLE_HEIGHT * 3.0,
            random_respawn: true,
            speed_step_distance: SPEED_STEP_DISTANCE,
            speed_increment: SPEED_INCREMENT,
            road_line_count: ROAD_LINE_COUNT,
            road_line_width: ROAD_LINE_WIDTH,
            road_line_spacing: ROAD_LINE_SPACING,
            shot_width: SHOT_WIDTH,
            shot_height: SHOT_HEIGHT,
            shot_speed: SHOT_SPEED,
        }
    }
}

impl HighwayConfig {
    /// Scroll speed at the start of a run
    pub fn initial_speed(&self) -> f32 {
        (self.enemy_speed * 2.0).floor()
    }

    /// Width of a single lane
    pub fn lane_width(&self) -> f32 {
        self.width / self.lane_count.max(1) as f32
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_bounds(self.width, self.height)?;
        if self.lane_count == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        if self.enemy_count == 0 {
            return Err(ConfigError::ZeroEntities("enemy"));
        }
        if self.lane_margin + self.vehicle_width > self.lane_width() {
            return Err(ConfigError::Geometry(format!(
                "vehicle ({} + {} margin) wider than lane ({})",
                self.vehicle_width,
                self.lane_margin,
                self.lane_width()
            )));
        }
        if self.vehicle_height >= self.height {
            return Err(ConfigError::Geometry(
                "vehicle taller than the road".to_string(),
            ));
        }
        let line_pitch = self.height / self.road_line_count.max(1) as f32;
        if self.road_line_count > 0 && line_pitch <= self.road_line_spacing {
            return Err(ConfigError::Geometry(
                "road line spacing leaves no room for the line".to_string(),
            ));
        }
        Ok(())
    }
}

/// Jump arc tuning (rise, hang, fall)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    /// Vertical velocity set by a jump (negative is up)
    pub jump_dy: f32,
    /// Per-tick acceleration while rising
    pub rise_decel: f32,
    /// Ticks of zero acceleration at the apex. The hang lasts exactly this
    /// many ticks; the browser game's frame-modulo counter held one fewer.
    pub hang_ticks: u32,
    /// Per-tick acceleration while falling
    pub gravity: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            jump_dy: JUMP_DY,
            rise_decel: RISE_DECEL,
            hang_ticks: HANG_TICKS,
            gravity: GRAVITY,
        }
    }
}

/// Side scroller tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollerConfig {
    pub width: f32,
    pub height: f32,
    pub flyer_width: f32,
    pub flyer_height: f32,
    pub gate_width: f32,
    /// Horizontal distance between consecutive gates at spawn
    pub gate_spacing: f32,
    pub gate_count: usize,
    pub gap_height: f32,
    pub gap_margin_ratio: f32,
    /// Horizontal gate velocity (negative scrolls left)
    pub scroll_dx: f32,
    /// Fall rate after spawning or bumping the ceiling
    pub default_dy: f32,
    pub jump: JumpTuning,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            width: SCROLLER_WIDTH,
            height: SCROLLER_HEIGHT,
            flyer_width: FLYER_WIDTH,
            flyer_height: FLYER_HEIGHT,
            gate_width: GATE_WIDTH,
            gate_spacing: GATE_SPACING,
            gate_count: GATE_COUNT,
            gap_height: GATE_GAP_HEIGHT,
            gap_margin_ratio: GAP_MARGIN_RATIO,
            scroll_dx: SCROLL_DX,
            default_dy: DEFAULT_DY,
            jump: JumpTuning::default(),
        }
    }
}

impl ScrollerConfig {
    /// Range `(min, max)` the top of a gap is drawn from
    pub fn gap_range(&self) -> (f32, f32) {
        let min = self.height * self.gap_margin_ratio;
        let max = self.height * (1.0 - self.gap_margin_ratio) - self.gap_height;
        (min, max)
    }

    /// Flyer spawn point
    pub fn flyer_start(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0 - self.flyer_height)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_bounds(self.width, self.height)?;
        if self.gate_count == 0 {
            return Err(ConfigError::ZeroEntities("gate"));
        }
        if self.scroll_dx >= 0.0 {
            return Err(ConfigError::Geometry(
                "gates must scroll left (scroll_dx < 0)".to_string(),
            ));
        }
        if self.flyer_height >= self.gap_height {
            return Err(ConfigError::Geometry(
                "gap too small for the flyer".to_string(),
            ));
        }
        let (min, max) = self.gap_range();
        if max < min {
            return Err(ConfigError::Geometry(format!(
                "gap of {} does not fit between margins ({min}..{max})",
                self.gap_height
            )));
        }
        Ok(())
    }
}

/// Collision swarm tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub width: f32,
    pub height: f32,
    pub preset: SwarmPreset,
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Per-axis velocity is drawn from `[-knots/2, knots/2)`
    pub knots: f32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self::from_preset(SwarmPreset::default())
    }
}

impl SwarmConfig {
    /// Create a config from a population preset
    pub fn from_preset(preset: SwarmPreset) -> Self {
        let (min_radius, max_radius) = preset.radius_range();
        Self {
            width: SWARM_WIDTH,
            height: SWARM_HEIGHT,
            preset,
            count: preset.count(),
            min_radius,
            max_radius,
            knots: KNOTS,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_bounds(self.width, self.height)?;
        if self.count == 0 {
            return Err(ConfigError::ZeroEntities("roamer"));
        }
        if self.min_radius <= 0.0 || self.min_radius > self.max_radius {
            return Err(ConfigError::Geometry(format!(
                "radius range {}..{} is invalid",
                self.min_radius, self.max_radius
            )));
        }
        if self.max_radius * 2.0 >= self.width.min(self.height) {
            return Err(ConfigError::Geometry(
                "roamers do not fit the arena".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration of one arcade variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum GameConfig {
    Highway(HighwayConfig),
    Scroller(ScrollerConfig),
    Swarm(SwarmConfig),
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::Highway(HighwayConfig::default())
    }
}

impl GameConfig {
    /// Parse and validate a JSON config document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a variant by its command-line name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "highway" | "burnout" => Some(GameConfig::Highway(HighwayConfig::default())),
            "scroller" | "flappy" => Some(GameConfig::Scroller(ScrollerConfig::default())),
            "swarm" | "swarm-balls" => Some(GameConfig::Swarm(SwarmConfig::default())),
            "swarm-ants" | "ants" => {
                Some(GameConfig::Swarm(SwarmConfig::from_preset(SwarmPreset::Ants)))
            }
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            GameConfig::Highway(c) => c.validate(),
            GameConfig::Scroller(c) => c.validate(),
            GameConfig::Swarm(c) => c.validate(),
        }
    }

    /// Arena size
    pub fn bounds(&self) -> Vec2 {
        match self {
            GameConfig::Highway(c) => Vec2::new(c.width, c.height),
            GameConfig::Scroller(c) => Vec2::new(c.width, c.height),
            GameConfig::Swarm(c) => Vec2::new(c.width, c.height),
        }
    }

    /// Same config resized to a rendering surface
    pub fn with_bounds(mut self, bounds: Vec2) -> Self {
        let (w, h) = match &mut self {
            GameConfig::Highway(c) => (&mut c.width, &mut c.height),
            GameConfig::Scroller(c) => (&mut c.width, &mut c.height),
            GameConfig::Swarm(c) => (&mut c.width, &mut c.height),
        };
        *w = bounds.x;
        *h = bounds.y;
        self
    }

    /// Storage key for this variant's best score
    pub fn best_score_key(&self) -> &'static str {
        match self {
            GameConfig::Highway(_) => "@BEST_SCORE",
            GameConfig::Scroller(_) => "@BEST_SCORE_KEY",
            GameConfig::Swarm(_) => "@BEST_SCORE_SWARM",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameConfig::Highway(_) => "highway",
            GameConfig::Scroller(_) => "scroller",
            GameConfig::Swarm(_) => "swarm",
        }
    }
}

fn check_bounds(width: f32, height: f32) -> Result<(), ConfigError> {
    if width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds { width, height })
    }
}
