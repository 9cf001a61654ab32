//! Per-frame simulation tick
//!
//! Advances the run by one host frame in a fixed order:
//! player → enemies → rewards → waves → particles → collisions → game over.

use super::collision::{check_game_over, resolve_collisions};
use super::motion::{update_enemies, update_player};
use super::particles::update_particles;
use super::rewards::update_rewards;
use super::scheduler::FrameTime;
use super::state::{GamePhase, GameState};
use super::waves::manage_waves;

/// Input intents for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash requested this frame (edge, not held)
    pub dash: bool,
}

/// Advance the game state by one frame. Does nothing unless playing.
pub fn tick(state: &mut GameState, input: &TickInput, frame: &FrameTime) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.game_time_ms += frame.delta_ms as f64;

    update_player(state, input, frame);
    update_enemies(state, frame);
    update_rewards(state, frame);
    manage_waves(state, frame);
    update_particles(state, frame);
    resolve_collisions(state);
    check_game_over(state);
}
