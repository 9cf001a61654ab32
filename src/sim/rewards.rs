//! Reward spawning and expiry

use rand::Rng;

use super::scheduler::FrameTime;
use super::state::{GameState, Reward};
use crate::polar_to_cartesian;

/// Maybe drop a reward near a random live enemy, then age existing rewards.
/// TTL counts real elapsed milliseconds, not time-scaled frames.
pub fn update_rewards(state: &mut GameState, frame: &FrameTime) {
    if state.rng.random::<f32>() < state.tuning.reward_spawn_chance && !state.enemies.is_empty() {
        spawn_reward(state);
    }

    for i in (0..state.rewards.len()).rev() {
        state.rewards[i].ttl_ms -= frame.delta_ms;
        if state.rewards[i].ttl_ms <= 0.0 {
            state.rewards.remove(i);
        }
    }
}

/// Place a reward at a random offset from a uniformly chosen enemy.
/// The value is frozen at the multiplier in effect right now.
pub fn spawn_reward(state: &mut GameState) {
    if state.enemies.is_empty() {
        return;
    }

    let tuning = &state.tuning;
    let idx = state.rng.random_range(0..state.enemies.len());
    let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
    let dist = tuning.reward_min_offset + state.rng.random::<f32>() * tuning.reward_offset_spread;

    let reward = Reward {
        pos: state.enemies[idx].pos + polar_to_cartesian(dist, angle),
        radius: tuning.reward_radius,
        value: tuning.reward_base_value * state.multiplier,
        ttl_ms: tuning.reward_ttl_ms,
    };
    state.rewards.push(reward);
}
