//! Asset gate
//!
//! A run may only start once every image its variant draws has resolved.
//! Loading itself belongs to the platform; the gate only tracks names.

use std::collections::BTreeSet;

use crate::config::{GameConfig, SwarmPreset};

/// Required assets and the subset reported as loaded
#[derive(Debug, Clone, Default)]
pub struct AssetGate {
    required: BTreeSet<String>,
    loaded: BTreeSet<String>,
}

impl AssetGate {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
            loaded: BTreeSet::new(),
        }
    }

    /// Gate with nothing to wait for
    pub fn ready() -> Self {
        Self::default()
    }

    /// Images drawn by a variant
    pub fn for_config(config: &GameConfig) -> Self {
        match config {
            GameConfig::Highway(_) => {
                Self::new(["img/player.png", "img/enemy.png", "img/bullet.png"])
            }
            GameConfig::Scroller(_) => Self::new(
                (1..=9)
                    .map(|i| format!("img/bird{i}.png"))
                    .chain(["img/pipe-top.png".to_string(), "img/pipe-bot.png".to_string()]),
            ),
            GameConfig::Swarm(c) => match c.preset {
                SwarmPreset::Ants => Self::new(["img/ant.png"]),
                SwarmPreset::Balls => Self::ready(),
            },
        }
    }

    /// Record a resolved asset. Returns false for names the gate does not need.
    pub fn mark_loaded(&mut self, name: &str) -> bool {
        if !self.required.contains(name) {
            log::debug!("Ignoring unrequested asset {name}");
            return false;
        }
        self.loaded.insert(name.to_string());
        true
    }

    pub fn is_ready(&self) -> bool {
        self.required.len() == self.loaded.len()
    }

    /// Assets still outstanding, in name order
    pub fn pending(&self) -> Vec<String> {
        self.required.difference(&self.loaded).cloned().collect()
    }

    /// Fraction of required assets loaded, 1.0 when none are required
    pub fn progress(&self) -> f32 {
        if self.required.is_empty() {
            1.0
        } else {
            self.loaded.len() as f32 / self.required.len() as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScrollerConfig, SwarmConfig};

    #[test]
    fn test_gate_opens_when_all_loaded() {
        let mut gate = AssetGate::new(["a.png", "b.png"]);
        assert!(!gate.is_ready());
        assert!(gate.mark_loaded("b.png"));
        assert_eq!(gate.pending(), vec!["a.png".to_string()]);
        assert_eq!(gate.progress(), 0.5);
        // Repeated reports do not count twice
        gate.mark_loaded("b.png");
        assert!(!gate.is_ready());
        gate.mark_loaded("a.png");
        assert!(gate.is_ready());
        assert!(gate.pending().is_empty());
    }

    #[test]
    fn test_unknown_asset_ignored() {
        let mut gate = AssetGate::new(["a.png"]);
        assert!(!gate.mark_loaded("c.png"));
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_requirements_per_variant() {
        let scroller = AssetGate::for_config(&GameConfig::Scroller(ScrollerConfig::default()));
        assert_eq!(scroller.pending().len(), 11);
        assert!(scroller.pending().contains(&"img/pipe-bot.png".to_string()));

        let balls = AssetGate::for_config(&GameConfig::Swarm(SwarmConfig::default()));
        assert!(balls.is_ready());
        assert_eq!(balls.progress(), 1.0);

        let ants = AssetGate::for_config(&GameConfig::Swarm(SwarmConfig::from_preset(
            SwarmPreset::Ants,
        )));
        assert_eq!(ants.pending(), vec!["img/ant.png".to_string()]);
    }
}
