//! Three-phase jump arc
//!
//! A jump sets an upward velocity, decelerates while rising, hangs at the
//! apex with zero acceleration for a fixed number of ticks, then falls
//! under normal gravity. The result is a fast rise, a float, and a fall.

use serde::{Deserialize, Serialize};

use crate::config::JumpTuning;

/// Current phase of the arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcPhase {
    /// Ascending after a jump
    Rising,
    /// Holding at the apex
    Hanging { remaining: u32 },
    /// Normal gravity
    Falling,
}

/// Vertical motion state of a jumping entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpArc {
    pub phase: ArcPhase,
}

impl Default for JumpArc {
    fn default() -> Self {
        Self {
            phase: ArcPhase::Falling,
        }
    }
}

impl JumpArc {
    /// Start a jump. Ignored while hanging at the apex.
    ///
    /// Returns whether the jump was accepted.
    pub fn trigger(&mut self, dy: &mut f32, tuning: &JumpTuning) -> bool {
        if self.is_hanging() {
            return false;
        }
        *dy = tuning.jump_dy;
        self.phase = ArcPhase::Rising;
        true
    }

    pub fn is_hanging(&self) -> bool {
        matches!(self.phase, ArcPhase::Hanging { .. })
    }

    /// Apply one tick of acceleration to `dy`
    pub fn step(&mut self, dy: &mut f32, tuning: &JumpTuning) {
        if self.phase == ArcPhase::Rising && *dy >= 0.0 {
            self.phase = if tuning.hang_ticks == 0 {
                ArcPhase::Falling
            } else {
                ArcPhase::Hanging {
                    remaining: tuning.hang_ticks,
                }
            };
        }

        let accel = match self.phase {
            ArcPhase::Rising => tuning.rise_decel,
            ArcPhase::Hanging { remaining } => {
                self.phase = if remaining <= 1 {
                    ArcPhase::Falling
                } else {
                    ArcPhase::Hanging {
                        remaining: remaining - 1,
                    }
                };
                0.0
            }
            ArcPhase::Falling => tuning.gravity,
        };
        *dy += accel;
    }
}
