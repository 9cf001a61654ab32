//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be re-tuned from
//! JSON without a rebuild. Defaults come from [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    pub target_frame_ms: f32,
    pub max_frame_delta_ms: f32,

    // === Arena ===
    pub arena_padding: f32,
    pub min_arena_radius: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub center_attraction: f32,
    pub dash_speed: f32,
    pub dash_duration_ms: f64,
    pub dash_cooldown_ms: f64,

    // === Enemies & waves ===
    pub enemy_radius: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_ramp_per_min: f32,
    pub enemy_speed_ramp_cap: f32,
    pub enemy_spawn_offset: f32,
    pub enemy_despawn_factor: f32,
    pub wave_delay_ms: f32,
    pub wave_base_enemies: u32,
    pub wave_enemies_per_wave: u32,
    pub spawn_chance: f32,

    // === Rewards ===
    pub reward_radius: f32,
    pub reward_spawn_chance: f32,
    pub reward_min_offset: f32,
    pub reward_offset_spread: f32,
    pub reward_base_value: f32,
    pub reward_ttl_ms: f32,
    pub multiplier_step: f32,

    // === Combat ===
    pub max_health: f32,
    pub hit_damage: f32,
    pub knockback: f32,
    pub dash_kill_score: f32,
    pub regen_chance: f32,
    pub regen_amount: f32,

    // === Particles ===
    pub particle_burst: usize,
    pub particle_fade: f32,
    pub particle_min_speed: f32,
    pub particle_speed_spread: f32,
    pub particle_min_radius: f32,
    pub particle_radius_spread: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_frame_ms: TARGET_FRAME_MS,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,

            arena_padding: ARENA_PADDING,
            min_arena_radius: MIN_ARENA_RADIUS,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            center_attraction: CENTER_ATTRACTION,
            dash_speed: DASH_SPEED,
            dash_duration_ms: DASH_DURATION_MS,
            dash_cooldown_ms: DASH_COOLDOWN_MS,

            enemy_radius: ENEMY_RADIUS,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_ramp_per_min: ENEMY_SPEED_RAMP_PER_MIN,
            enemy_speed_ramp_cap: ENEMY_SPEED_RAMP_CAP,
            enemy_spawn_offset: ENEMY_SPAWN_OFFSET,
            enemy_despawn_factor: ENEMY_DESPAWN_FACTOR,
            wave_delay_ms: WAVE_DELAY_MS,
            wave_base_enemies: WAVE_BASE_ENEMIES,
            wave_enemies_per_wave: WAVE_ENEMIES_PER_WAVE,
            spawn_chance: SPAWN_CHANCE,

            reward_radius: REWARD_RADIUS,
            reward_spawn_chance: REWARD_SPAWN_CHANCE,
            reward_min_offset: REWARD_MIN_OFFSET,
            reward_offset_spread: REWARD_OFFSET_SPREAD,
            reward_base_value: REWARD_BASE_VALUE,
            reward_ttl_ms: REWARD_TTL_MS,
            multiplier_step: MULTIPLIER_STEP,

            max_health: MAX_HEALTH,
            hit_damage: HIT_DAMAGE,
            knockback: KNOCKBACK,
            dash_kill_score: DASH_KILL_SCORE,
            regen_chance: REGEN_CHANCE,
            regen_amount: REGEN_AMOUNT,

            particle_burst: PARTICLE_BURST,
            particle_fade: PARTICLE_FADE,
            particle_min_speed: PARTICLE_MIN_SPEED,
            particle_speed_spread: PARTICLE_SPEED_SPREAD,
            particle_min_radius: PARTICLE_MIN_RADIUS,
            particle_radius_spread: PARTICLE_RADIUS_SPREAD,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would break the simulation back to their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn fix_positive(name: &str, value: &mut f32, default: f32) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Tuning: {} must be > 0 (got {}), using {}", name, value, default);
                *value = default;
            }
        }

        fn fix_non_negative(name: &str, value: &mut f32, default: f32) {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("Tuning: {} must be >= 0 (got {}), using {}", name, value, default);
                *value = default;
            }
        }

        fn fix_probability(name: &str, value: &mut f32, default: f32) {
            if !value.is_finite() || !(0.0..=1.0).contains(value) {
                log::warn!(
                    "Tuning: {} must be in [0, 1] (got {}), using {}",
                    name,
                    value,
                    default
                );
                *value = default;
            }
        }

        fix_positive("target_frame_ms", &mut self.target_frame_ms, defaults.target_frame_ms);
        fix_positive(
            "max_frame_delta_ms",
            &mut self.max_frame_delta_ms,
            defaults.max_frame_delta_ms,
        );
        fix_positive("player_radius", &mut self.player_radius, defaults.player_radius);
        fix_positive("enemy_radius", &mut self.enemy_radius, defaults.enemy_radius);
        fix_positive("reward_radius", &mut self.reward_radius, defaults.reward_radius);
        fix_positive("max_health", &mut self.max_health, defaults.max_health);
        fix_positive("reward_ttl_ms", &mut self.reward_ttl_ms, defaults.reward_ttl_ms);
        fix_positive("particle_fade", &mut self.particle_fade, defaults.particle_fade);

        fix_non_negative("hit_damage", &mut self.hit_damage, defaults.hit_damage);
        fix_non_negative("regen_amount", &mut self.regen_amount, defaults.regen_amount);
        fix_non_negative("knockback", &mut self.knockback, defaults.knockback);
        fix_non_negative("multiplier_step", &mut self.multiplier_step, defaults.multiplier_step);
        fix_non_negative(
            "enemy_spawn_offset",
            &mut self.enemy_spawn_offset,
            defaults.enemy_spawn_offset,
        );

        // Health is a percentage
        if self.max_health > MAX_HEALTH {
            log::warn!("Tuning: max_health {} above {}, capping", self.max_health, MAX_HEALTH);
            self.max_health = MAX_HEALTH;
        }

        fix_probability("spawn_chance", &mut self.spawn_chance, defaults.spawn_chance);
        fix_probability(
            "reward_spawn_chance",
            &mut self.reward_spawn_chance,
            defaults.reward_spawn_chance,
        );
        fix_probability("regen_chance", &mut self.regen_chance, defaults.regen_chance);

        // The arena must always leave room for the player
        let min_radius = self.player_radius * 2.0;
        if !self.min_arena_radius.is_finite() || self.min_arena_radius < min_radius {
            log::warn!(
                "Tuning: min_arena_radius {} too small for player, using {}",
                self.min_arena_radius,
                min_radius
            );
            self.min_arena_radius = min_radius;
        }

        // Enemies spawn `enemy_spawn_offset` outside the wall and must not be
        // culled there, even in the smallest arena
        let min_despawn = 1.0 + self.enemy_spawn_offset / self.min_arena_radius;
        if !self.enemy_despawn_factor.is_finite() || self.enemy_despawn_factor <= min_despawn {
            let fixed = defaults.enemy_despawn_factor.max(min_despawn * 1.05);
            log::warn!(
                "Tuning: enemy_despawn_factor {} would cull fresh spawns, using {}",
                self.enemy_despawn_factor,
                fixed
            );
            self.enemy_despawn_factor = fixed;
        }

        if self.dash_cooldown_ms < 0.0 || self.dash_duration_ms < 0.0 {
            log::warn!("Tuning: negative dash timings, using defaults");
            self.dash_cooldown_ms = defaults.dash_cooldown_ms;
            self.dash_duration_ms = defaults.dash_duration_ms;
        }

        self
    }

    /// Enemies owed by a wave started at `wave`
    pub fn wave_size(&self, wave: u32) -> u32 {
        self.wave_base_enemies + self.wave_enemies_per_wave * wave
    }

    /// Enemy speed for a spawn at `game_time_ms` (linear ramp, capped)
    pub fn enemy_speed_at(&self, game_time_ms: f64) -> f32 {
        let minutes = (game_time_ms.max(0.0) / 60_000.0) as f32;
        let ramp = (minutes * self.enemy_speed_ramp_per_min).min(self.enemy_speed_ramp_cap);
        self.enemy_base_speed + ramp
    }

    /// Largest speed the ramp can ever produce
    pub fn enemy_max_speed(&self) -> f32 {
        self.enemy_base_speed + self.enemy_speed_ramp_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.wave_size(1), 5);
        assert_eq!(t.wave_size(4), 11);
        assert!((t.enemy_max_speed() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_json_partial() {
        let t = Tuning::from_json(r#"{ "hit_damage": 7.5, "spawn_chance": 0.25 }"#).unwrap();
        assert_eq!(t.hit_damage, 7.5);
        assert_eq!(t.spawn_chance, 0.25);
        assert_eq!(t.player_radius, PLAYER_RADIUS);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_sanitized_fixes_bad_values() {
        let json = r#"{ "spawn_chance": 4.0, "player_radius": -1.0, "min_arena_radius": 1.0 }"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.spawn_chance, SPAWN_CHANCE);
        assert_eq!(t.player_radius, PLAYER_RADIUS);
        assert!(t.min_arena_radius >= t.player_radius * 2.0);
    }

    #[test]
    fn test_sanitized_keeps_multiplier_and_health_in_range() {
        let t = Tuning::from_json(r#"{ "multiplier_step": -0.5, "max_health": 250.0 }"#).unwrap();
        assert_eq!(t.multiplier_step, MULTIPLIER_STEP);
        assert_eq!(t.max_health, MAX_HEALTH);

        let t = Tuning::from_json(r#"{ "max_health": 40.0 }"#).unwrap();
        assert_eq!(t.max_health, 40.0);
    }

    #[test]
    fn test_sanitized_rejects_negative_combat_values() {
        let json = r#"{ "hit_damage": -5.0, "regen_amount": -1.0, "knockback": -10.0 }"#;
        let t = Tuning::from_json(json).unwrap();
        assert_eq!(t.hit_damage, HIT_DAMAGE);
        assert_eq!(t.regen_amount, REGEN_AMOUNT);
        assert_eq!(t.knockback, KNOCKBACK);

        // Zero is a legitimate choice (e.g. a no-damage practice mode)
        let t = Tuning::from_json(r#"{ "hit_damage": 0.0 }"#).unwrap();
        assert_eq!(t.hit_damage, 0.0);
    }

    #[test]
    fn test_sanitized_despawn_factor_clears_spawn_ring() {
        let t = Tuning::from_json(r#"{ "enemy_despawn_factor": 0.5 }"#).unwrap();
        assert_eq!(t.enemy_despawn_factor, ENEMY_DESPAWN_FACTOR);

        let json = r#"{ "enemy_spawn_offset": 200.0, "enemy_despawn_factor": 2.0 }"#;
        let t = Tuning::from_json(json).unwrap();
        let r = t.min_arena_radius;
        assert!(r * t.enemy_despawn_factor > r + t.enemy_spawn_offset);
    }

    #[test]
    fn test_json_roundtrip_default() {
        let json = Tuning::default().to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), Tuning::default());
    }

    #[test]
    fn test_enemy_speed_ramp_points() {
        let t = Tuning::default();
        assert!((t.enemy_speed_at(0.0) - 1.5).abs() < 1e-6);
        assert!((t.enemy_speed_at(60_000.0) - 2.0).abs() < 1e-5);
        assert!((t.enemy_speed_at(3_600_000.0) - 5.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_enemy_speed_monotonic_and_capped(a in 0.0f64..1.0e8, b in 0.0f64..1.0e8) {
            let t = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(t.enemy_speed_at(lo) <= t.enemy_speed_at(hi));
            prop_assert!(t.enemy_speed_at(hi) <= t.enemy_max_speed());
        }
    }
}
