//! HUD readouts
//!
//! The three numbers the player sees every frame, pre-formatted.

use std::fmt;

use crate::sim::GameState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    /// Score, truncated
    pub score: u64,
    pub multiplier: f32,
    /// Health, rounded up so a sliver still reads as 1%
    pub health: u32,
    pub wave: u32,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score.max(0.0).floor() as u64,
            multiplier: state.multiplier,
            health: state.health.max(0.0).ceil() as u32,
            wave: state.waves.active_wave(),
        }
    }

    pub fn score_text(&self) -> String {
        self.score.to_string()
    }

    pub fn multiplier_text(&self) -> String {
        format!("{:.1}x", self.multiplier)
    }

    pub fn health_text(&self) -> String {
        format!("{}%", self.health)
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wave {} | score {} | {} | health {}",
            self.wave,
            self.score_text(),
            self.multiplier_text(),
            self.health_text()
        )
    }
}
