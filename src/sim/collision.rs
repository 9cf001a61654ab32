//! Collision resolution and scoring
//!
//! Runs after all movement so every test sees this frame's positions.
//! Enemies resolve front to back with order-preserving removal; knockback
//! lands immediately (and is re-contained), so later enemies test against
//! the displaced player.

use rand::Rng;

use super::motion::contain_player;
use super::particles::spawn_burst;
use super::state::{GameEvent, GamePhase, GameState, ParticleColor};
use crate::{circles_overlap, direction_or_zero};

/// Resolve every collision for this frame, then passive regeneration
pub fn resolve_collisions(state: &mut GameState) {
    resolve_enemy_contacts(state);
    collect_rewards(state);
    regenerate(state);
}

/// Player vs enemies. Each contact raises `EnemyDestroyed` or `DamageTaken`.
pub fn resolve_enemy_contacts(state: &mut GameState) {
    let mut i = 0;

    while i < state.enemies.len() {
        let enemy_pos = state.enemies[i].pos;
        let enemy_radius = state.enemies[i].radius;

        if !circles_overlap(state.player.pos, state.player.radius, enemy_pos, enemy_radius) {
            i += 1;
            continue;
        }

        if state.player.dashing {
            let score = (state.tuning.dash_kill_score * state.multiplier) as f64;
            spawn_burst(state, enemy_pos, ParticleColor::Enemy);
            state.enemies.remove(i);
            state.score += score;
            state.push_event(GameEvent::EnemyDestroyed { pos: enemy_pos });
            // Same index now holds the next enemy
            continue;
        }

        let damage = state.tuning.hit_damage;
        state.damage(damage);
        let player_pos = state.player.pos;
        spawn_burst(state, player_pos, ParticleColor::Player);

        let away = direction_or_zero(enemy_pos, state.player.pos);
        state.player.pos += away * state.tuning.knockback;
        contain_player(state);
        state.multiplier = 1.0;

        log::debug!("Player hit, health {:.1}", state.health);
        state.push_event(GameEvent::DamageTaken { amount: damage });
        i += 1;
    }
}

/// Player vs rewards (back to front). Returns the total value collected.
pub fn collect_rewards(state: &mut GameState) -> f64 {
    let mut collected = 0.0;

    for i in (0..state.rewards.len()).rev() {
        let reward = &state.rewards[i];
        if !circles_overlap(state.player.pos, state.player.radius, reward.pos, reward.radius) {
            continue;
        }

        let reward = state.rewards.remove(i);
        state.score += reward.value as f64;
        state.multiplier += state.tuning.multiplier_step;
        spawn_burst(state, reward.pos, ParticleColor::Reward);
        state.push_event(GameEvent::RewardCollected { value: reward.value });
        collected += reward.value as f64;
    }

    collected
}

/// Small random chance each frame to heal while hurt
pub fn regenerate(state: &mut GameState) {
    if state.health < state.tuning.max_health
        && state.rng.random::<f32>() < state.tuning.regen_chance
    {
        state.heal(state.tuning.regen_amount);
    }
}

/// End the run when health is gone. Returns true only on the transition.
pub fn check_game_over(state: &mut GameState) -> bool {
    if state.health > 0.0 || state.phase == GamePhase::Ended {
        return false;
    }

    state.phase = GamePhase::Ended;
    log::info!(
        "Game over: score {} at wave {}",
        state.score.floor(),
        state.waves.active_wave()
    );
    state.push_event(GameEvent::GameEnded { score: state.score });
    true
}
