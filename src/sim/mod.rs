//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host timestamps only (no wall clock reads)
//! - Seeded RNG only
//! - Stable iteration order (insertion order, removals preserve it)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod motion;
pub mod particles;
pub mod rewards;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod waves;

pub use collision::{check_game_over, resolve_collisions};
pub use scheduler::{FrameScheduler, FrameTime, LoopControl, LoopToken, ManualClock, TimeSource};
pub use state::{
    Arena, Enemy, GameEvent, GamePhase, GameState, Particle, ParticleColor, Player, Reward,
    WaveState,
};
pub use tick::{TickInput, tick};
