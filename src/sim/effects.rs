//! Presentation-only timed effects
//!
//! Flash pulses are scheduled by id and counted down once per frame. They
//! never read or write physics state, so a pulse that outlives its entity
//! simply expires.

use serde::Serialize;

use super::entity::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct Flash {
    id: EntityId,
    remaining: u32,
}

/// Pending flash pulses
#[derive(Debug, Clone, Default)]
pub struct Effects {
    flashes: Vec<Flash>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a flash on `id` lasting `ticks` frames
    pub fn flash(&mut self, id: EntityId, ticks: u32) {
        if ticks == 0 {
            return;
        }
        match self.flashes.iter_mut().find(|f| f.id == id) {
            Some(f) => f.remaining = ticks,
            None => self.flashes.push(Flash { id, remaining: ticks }),
        }
    }

    /// Count every pulse down one frame, dropping expired ones
    pub fn expire(&mut self) {
        for f in &mut self.flashes {
            f.remaining = f.remaining.saturating_sub(1);
        }
        self.flashes.retain(|f| f.remaining > 0);
    }

    pub fn is_flashing(&self, id: EntityId) -> bool {
        self.flashes.iter().any(|f| f.id == id)
    }

    pub fn clear(&mut self) {
        self.flashes.clear();
    }

    pub fn len(&self) -> usize {
        self.flashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_expires() {
        let mut fx = Effects::new();
        fx.flash(EntityId(1), 2);
        assert!(fx.is_flashing(EntityId(1)));
        fx.expire();
        assert!(fx.is_flashing(EntityId(1)));
        fx.expire();
        assert!(!fx.is_flashing(EntityId(1)));
        assert!(fx.is_empty());
    }

    #[test]
    fn test_reflash_restarts_countdown() {
        let mut fx = Effects::new();
        fx.flash(EntityId(7), 2);
        fx.expire();
        fx.flash(EntityId(7), 2);
        fx.expire();
        assert!(fx.is_flashing(EntityId(7)));
        assert_eq!(fx.len(), 1);
    }

    #[test]
    fn test_zero_length_flash_is_ignored() {
        let mut fx = Effects::new();
        fx.flash(EntityId(1), 0);
        assert!(fx.is_empty());
    }
}
