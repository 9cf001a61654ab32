//! Player movement, dash, arena containment and enemy pursuit

use glam::Vec2;

use super::scheduler::FrameTime;
use super::state::{GameEvent, GameState};
use super::tick::TickInput;
use crate::{cartesian_to_polar, direction_or_zero, polar_to_cartesian};

/// Unit movement direction from the held direction keys
pub fn input_direction(input: &TickInput) -> Vec2 {
    let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
    Vec2::new(axis(input.right, input.left), axis(input.down, input.up)).normalize_or_zero()
}

/// Pull toward the center, stronger the further out the player is.
/// Zero when the player sits exactly on the center.
pub fn center_attraction(pos: Vec2, center: Vec2, arena_radius: f32, base: f32) -> Vec2 {
    let dist = pos.distance(center);
    if dist <= 0.0 || arena_radius <= 0.0 {
        return Vec2::ZERO;
    }
    direction_or_zero(pos, center) * base * (1.0 + dist / arena_radius)
}

/// Resolve input, attraction and dash into velocity, then integrate and contain
pub fn update_player(state: &mut GameState, input: &TickInput, frame: &FrameTime) {
    let tuning = &state.tuning;
    let center = state.arena.center;
    let player = &mut state.player;

    let mut vel = input_direction(input) * player.speed;
    vel += center_attraction(player.pos, center, state.arena.radius, tuning.center_attraction);

    let now = frame.now;
    let dash_active = now < player.dash_end_time;
    let mut dash_started = false;

    if input.dash && player.dash_ready(now, tuning.dash_cooldown_ms) && !dash_active {
        player.dash_end_time = now + tuning.dash_duration_ms;
        player.last_dash_time = Some(now);
        player.dashing = true;
        vel += direction_or_zero(player.pos, center) * tuning.dash_speed;
        dash_started = true;
    } else if now >= player.dash_end_time {
        player.dashing = false;
    }

    player.vel = vel;
    player.pos += vel * frame.time_scale;

    if dash_started {
        log::debug!("Dash at t={:.0}ms", now);
        state.push_event(GameEvent::DashStarted);
    }

    contain_player(state);
}

/// Polar clamp: pull the player back onto the boundary circle along its angle
pub fn contain_player(state: &mut GameState) {
    let center = state.arena.center;
    let limit = state.arena.limit_for(state.player.radius);
    let (dist, theta) = cartesian_to_polar(state.player.pos - center);

    if dist > limit {
        state.player.pos = center + polar_to_cartesian(limit, theta);
    }
}

/// Steer every enemy straight at the player; cull enemies that drift too far
pub fn update_enemies(state: &mut GameState, frame: &FrameTime) {
    let target = state.player.pos;
    let center = state.arena.center;
    let max_dist = state.arena.radius * state.tuning.enemy_despawn_factor;

    state.enemies.retain_mut(|enemy| {
        enemy.pos += direction_or_zero(enemy.pos, target) * enemy.speed * frame.time_scale;
        enemy.pos.distance(center) <= max_dist
    });
}
