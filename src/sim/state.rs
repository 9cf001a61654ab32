//! Game state and core simulation types
//!
//! One `GameState` owns every entity of a run. All update steps take it by
//! `&mut` and nothing else holds game data, so a reset is simply a new value.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{REWARD_FADE_MS, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::tuning::Tuning;

/// Overall phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, waiting for `start`
    NotStarted,
    /// Active gameplay
    Playing,
    /// Frame loop halted by the host
    Paused,
    /// Health ran out
    Ended,
}

/// The circular playfield, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub center: Vec2,
    pub radius: f32,
}

impl Arena {
    /// Build the arena for a viewport. Non-positive or non-finite sizes are
    /// treated as zero and the radius never drops below `min_arena_radius`.
    pub fn from_viewport(width: f32, height: f32, tuning: &Tuning) -> Self {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let (w, h) = (sanitize(width), sanitize(height));
        if w != width || h != height {
            log::warn!("Invalid viewport {}x{}, clamping", width, height);
        }

        let center = Vec2::new(w / 2.0, h / 2.0);
        let radius = (center.x.min(center.y) - tuning.arena_padding).max(tuning.min_arena_radius);
        Self { center, radius }
    }

    /// Furthest a circle of `radius` may sit from the center
    #[inline]
    pub fn limit_for(&self, radius: f32) -> f32 {
        (self.radius - radius).max(0.0)
    }
}

/// The player-controlled entity
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub dashing: bool,
    /// Timestamp (ms) the current dash expires
    pub dash_end_time: f64,
    /// Timestamp (ms) of the last dash start, `None` before the first dash
    pub last_dash_time: Option<f64>,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed: tuning.player_speed,
            radius: tuning.player_radius,
            dashing: false,
            dash_end_time: 0.0,
            last_dash_time: None,
        }
    }

    /// Whether the cooldown since the last dash start has elapsed at `now`
    pub fn dash_ready(&self, now: f64, cooldown_ms: f64) -> bool {
        match self.last_dash_time {
            Some(last) => now - last > cooldown_ms,
            None => true,
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    /// Fixed at spawn from the difficulty ramp
    pub speed: f32,
    pub radius: f32,
}

/// A time-limited score pickup
#[derive(Debug, Clone)]
pub struct Reward {
    pub pos: Vec2,
    pub radius: f32,
    /// Frozen at spawn (base value times the multiplier at that moment)
    pub value: f32,
    pub ttl_ms: f32,
}

impl Reward {
    /// Draw opacity: solid until the final fade window, then linear to zero
    pub fn opacity(&self) -> f32 {
        (self.ttl_ms / REWARD_FADE_MS).clamp(0.0, 1.0)
    }
}

/// Particle color tag, mapped to a real color by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Enemy destroyed by a dash
    Enemy,
    /// Player took a hit
    Player,
    /// Reward collected
    Reward,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: ParticleColor,
    /// 0-1, decreases over time
    pub alpha: f32,
}

/// Spawn pacing state
#[derive(Debug, Clone, Default)]
pub struct WaveState {
    /// Number the next started wave will get (starts at 1)
    pub current_wave: u32,
    /// Accumulated idle time toward the next wave (ms)
    pub timer_ms: f32,
    /// Enemies still owed by the current wave
    pub enemies_to_spawn: u32,
    pub in_progress: bool,
    /// Enemies actually emitted for the most recently started wave
    pub spawned_this_wave: u32,
}

impl WaveState {
    pub fn new() -> Self {
        Self {
            current_wave: 1,
            ..Default::default()
        }
    }

    /// The wave currently running (0 before the first wave starts)
    pub fn active_wave(&self) -> u32 {
        self.current_wave.saturating_sub(1)
    }
}

/// Discrete triggers for audio and other collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    WaveStarted { wave: u32, enemies: u32 },
    DashStarted,
    RewardCollected { value: f32 },
    DamageTaken { amount: f32 },
    EnemyDestroyed { pos: Vec2 },
    GameEnded { score: f64 },
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, the only source of randomness in the simulation
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub rewards: Vec<Reward>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub waves: WaveState,
    pub score: f64,
    pub multiplier: f32,
    pub health: f32,
    /// Accumulated playing time (ms)
    pub game_time_ms: f64,
    pub phase: GamePhase,
    /// Particle cap for this run (0 disables particles)
    pub max_particles: usize,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run in the default viewport
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let arena = Arena::from_viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT, &tuning);
        Self::with_arena(seed, tuning, arena)
    }

    /// Create a fresh run inside `arena`. The first wave is queued immediately.
    pub fn with_arena(seed: u64, tuning: Tuning, arena: Arena) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(arena.center, &tuning),
            arena,
            enemies: Vec::new(),
            rewards: Vec::new(),
            particles: Vec::new(),
            waves: WaveState::new(),
            score: 0.0,
            multiplier: 1.0,
            health: tuning.max_health,
            game_time_ms: 0.0,
            phase: GamePhase::NotStarted,
            max_particles: tuning.max_particles,
            events: Vec::new(),
            tuning,
        };

        super::waves::start_next_wave(&mut state);

        state
    }

    /// Reduce health, clamped at zero
    pub fn damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.tuning.max_health);
    }

    /// Restore health, clamped at max
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, self.tuning.max_health);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Move the arena (e.g. on viewport resize), carrying every entity along
    pub fn relocate_arena(&mut self, arena: Arena) {
        let offset = arena.center - self.arena.center;
        self.arena = arena;

        self.player.pos += offset;
        for enemy in &mut self.enemies {
            enemy.pos += offset;
        }
        for reward in &mut self.rewards {
            reward.pos += offset;
        }
        for particle in &mut self.particles {
            particle.pos += offset;
        }

        super::motion::contain_player(self);
    }
}
