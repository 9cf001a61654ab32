//! Wave director
//!
//! Two concerns kept apart: how many enemies a wave still owes
//! (`enemies_to_spawn`) and when each one actually appears (a per-frame roll).
//! Spawns trickle in instead of landing as one wall.

use rand::Rng;

use super::scheduler::FrameTime;
use super::state::{Enemy, GameEvent, GameState};
use crate::polar_to_cartesian;

/// Queue the next wave and advance the wave counter
pub fn start_next_wave(state: &mut GameState) {
    let waves = &mut state.waves;
    waves.in_progress = true;
    waves.timer_ms = 0.0;

    let wave = waves.current_wave;
    let enemies = state.tuning.wave_size(wave);
    waves.enemies_to_spawn = enemies;
    waves.spawned_this_wave = 0;

    log::info!("Starting wave {} ({} enemies)", wave, enemies);

    waves.current_wave += 1;
    // Pacing from here on is handled by `manage_waves`
    waves.in_progress = false;

    state.push_event(GameEvent::WaveStarted { wave, enemies });
}

/// Emit owed enemies stochastically, or count down to the next wave once
/// the arena is clear
pub fn manage_waves(state: &mut GameState, frame: &FrameTime) {
    if state.waves.enemies_to_spawn > 0 {
        if state.rng.random::<f32>() < state.tuning.spawn_chance {
            spawn_enemy(state);
            state.waves.enemies_to_spawn -= 1;
            state.waves.spawned_this_wave += 1;
        }
    } else if state.enemies.is_empty() && !state.waves.in_progress {
        state.waves.timer_ms += frame.delta_ms;
        if state.waves.timer_ms > state.tuning.wave_delay_ms {
            start_next_wave(state);
        }
    }
}

/// Place one enemy on a random bearing just outside the wall
pub fn spawn_enemy(state: &mut GameState) {
    let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
    let dist = state.arena.radius + state.tuning.enemy_spawn_offset;
    let pos = state.arena.center + polar_to_cartesian(dist, angle);
    let speed = state.tuning.enemy_speed_at(state.game_time_ms);

    state.enemies.push(Enemy {
        pos,
        speed,
        radius: state.tuning.enemy_radius,
    });
}
