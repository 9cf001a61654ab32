//! Idle/demo mode - the game plays itself
//!
//! Produces the same `TickInput` a human would, so the simulation can't tell
//! the difference.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;

/// Enemies closer than this push the autopilot away
const THREAT_RADIUS: f32 = 140.0;
/// Extra reach beyond touching at which a dash is worth spending
const DASH_MARGIN: f32 = 20.0;
/// Axis component needed before a direction key is held
const KEY_THRESHOLD: f32 = 0.35;

/// Decide this frame's input from the current state
pub fn plan(state: &GameState, now: f64) -> TickInput {
    let player = &state.player;

    let nearest = state
        .enemies
        .iter()
        .map(|e| (e, e.pos.distance(player.pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let dash_ready = !player.dashing && player.dash_ready(now, state.tuning.dash_cooldown_ms);
    let dash = match nearest {
        Some((enemy, dist)) => dash_ready && dist < player.radius + enemy.radius + DASH_MARGIN,
        None => false,
    };

    // Sum of repulsion from nearby enemies, weighted by closeness
    let repulsion: Vec2 = state
        .enemies
        .iter()
        .filter_map(|e| {
            let dist = e.pos.distance(player.pos);
            (dist < THREAT_RADIUS)
                .then(|| (player.pos - e.pos).normalize_or_zero() * (1.0 - dist / THREAT_RADIUS))
        })
        .sum();

    let desired = if repulsion.length_squared() > 1e-4 {
        // Lean back toward the middle so we don't get pinned on the wall
        let to_center = (state.arena.center - player.pos) / state.arena.radius;
        repulsion.normalize_or_zero() + to_center * 0.5
    } else if let Some(reward) = state
        .rewards
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance(player.pos)
                .partial_cmp(&b.pos.distance(player.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    {
        reward.pos - player.pos
    } else {
        Vec2::ZERO
    };

    let dir = desired.normalize_or_zero();
    TickInput {
        up: dir.y < -KEY_THRESHOLD,
        down: dir.y > KEY_THRESHOLD,
        left: dir.x < -KEY_THRESHOLD,
        right: dir.x > KEY_THRESHOLD,
        dash,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, Reward};
    use crate::tuning::Tuning;

    fn enemy_at(pos: Vec2) -> Enemy {
        Enemy {
            pos,
            speed: 1.5,
            radius: 10.0,
        }
    }

    #[test]
    fn test_idle_when_nothing_around() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(plan(&state, 0.0), TickInput::default());
    }

    #[test]
    fn test_flees_nearby_enemy() {
        let mut state = GameState::new(1, Tuning::default());
        let p = state.player.pos;
        state.enemies.push(enemy_at(p + Vec2::new(80.0, 0.0)));
        let input = plan(&state, 0.0);
        assert!(input.left);
        assert!(!input.right);
        assert!(!input.dash);
    }

    #[test]
    fn test_dashes_when_enemy_close() {
        let mut state = GameState::new(1, Tuning::default());
        let p = state.player.pos;
        state.enemies.push(enemy_at(p + Vec2::new(0.0, 35.0)));
        assert!(plan(&state, 0.0).dash);

        state.player.last_dash_time = Some(0.0);
        assert!(!plan(&state, 500.0).dash);
    }

    #[test]
    fn test_chases_reward_when_safe() {
        let mut state = GameState::new(1, Tuning::default());
        let p = state.player.pos;
        state.rewards.push(Reward {
            pos: p + Vec2::new(0.0, -100.0),
            radius: 8.0,
            value: 10.0,
            ttl_ms: 3000.0,
        });
        let input = plan(&state, 0.0);
        assert!(input.up);
        assert!(!input.left && !input.right);
    }
}
