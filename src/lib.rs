//! Neon Arena - A circular arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, waves, collisions, game state)
//! - `game`: Lifecycle and frame loop around the simulation
//! - `input`: Keyboard bindings and held-key state
//! - `hud`: Score/multiplier/health readouts
//! - `audio`: Event-driven sound effects
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod game;
pub mod hud;
pub mod input;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use hud::Hud;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Nominal frame interval the motion constants are expressed in (60 Hz)
    pub const TARGET_FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame delta accepted before clamping (tab suspend guard)
    pub const MAX_FRAME_DELTA_MS: f32 = 250.0;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Gap between viewport edge and arena wall
    pub const ARENA_PADDING: f32 = 50.0;
    /// Smallest arena we will ever build, whatever the viewport says
    pub const MIN_ARENA_RADIUS: f32 = 60.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Base pull toward the arena center (scaled up with distance)
    pub const CENTER_ATTRACTION: f32 = 0.05;

    /// Dash: impulse toward center, in ms for timings
    pub const DASH_SPEED: f32 = 15.0;
    pub const DASH_DURATION_MS: f64 = 300.0;
    pub const DASH_COOLDOWN_MS: f64 = 1000.0;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 10.0;
    pub const ENEMY_BASE_SPEED: f32 = 1.5;
    /// Speed gained per minute of game time
    pub const ENEMY_SPEED_RAMP_PER_MIN: f32 = 0.5;
    /// Maximum bonus on top of base speed (1.5 + 3.5 = 5.0)
    pub const ENEMY_SPEED_RAMP_CAP: f32 = 3.5;
    /// Enemies spawn this far outside the wall
    pub const ENEMY_SPAWN_OFFSET: f32 = 50.0;
    /// Enemies beyond `arena_radius * factor` are culled
    pub const ENEMY_DESPAWN_FACTOR: f32 = 2.0;

    /// Waves
    pub const WAVE_DELAY_MS: f32 = 2000.0;
    pub const WAVE_BASE_ENEMIES: u32 = 3;
    pub const WAVE_ENEMIES_PER_WAVE: u32 = 2;
    pub const SPAWN_CHANCE: f32 = 0.1;

    /// Rewards
    pub const REWARD_RADIUS: f32 = 8.0;
    pub const REWARD_SPAWN_CHANCE: f32 = 0.02;
    pub const REWARD_MIN_OFFSET: f32 = 30.0;
    pub const REWARD_OFFSET_SPREAD: f32 = 50.0;
    pub const REWARD_BASE_VALUE: f32 = 10.0;
    pub const REWARD_TTL_MS: f32 = 3000.0;
    /// Rewards fade out over their last half second
    pub const REWARD_FADE_MS: f32 = 500.0;
    pub const MULTIPLIER_STEP: f32 = 0.1;

    /// Combat
    pub const MAX_HEALTH: f32 = 100.0;
    pub const HIT_DAMAGE: f32 = 5.0;
    pub const KNOCKBACK: f32 = 10.0;
    pub const DASH_KILL_SCORE: f32 = 50.0;
    pub const REGEN_CHANCE: f32 = 0.01;
    pub const REGEN_AMOUNT: f32 = 0.5;

    /// Particles
    pub const PARTICLE_BURST: usize = 10;
    pub const PARTICLE_FADE: f32 = 0.02;
    pub const PARTICLE_MIN_SPEED: f32 = 1.0;
    pub const PARTICLE_SPEED_SPREAD: f32 = 2.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 2.0;
    pub const PARTICLE_RADIUS_SPREAD: f32 = 3.0;
    pub const MAX_PARTICLES: usize = 512;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_or_zero(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Circle-circle overlap (strict, touching circles do not overlap)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_roundtrip_angle() {
        let p = polar_to_cartesian(10.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - PI / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_direction_or_zero_degenerate() {
        let p = Vec2::new(4.0, 4.0);
        assert_eq!(direction_or_zero(p, p), Vec2::ZERO);
        let d = direction_or_zero(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((d - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 15.0, Vec2::new(24.0, 0.0), 10.0));
        // Exactly touching is not an overlap
        assert!(!circles_overlap(Vec2::ZERO, 15.0, Vec2::new(25.0, 0.0), 10.0));
    }
}
