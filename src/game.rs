//! Game lifecycle and frame loop
//!
//! `Game` wraps a `GameState` with everything the host needs: start/pause/
//! resume/reset, viewport changes, and a frame entry point that turns host
//! timestamps into simulation ticks.
//!
//! Hosts drive it from a per-frame callback. A callback scheduled by an old
//! loop carries an old [`LoopToken`], and `frame_for` ignores it, so a reset
//! can never be clobbered by the loop it replaced.

use rand::RngCore;

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::hud::Hud;
use crate::sim::autopilot;
use crate::sim::{
    Arena, FrameScheduler, GameEvent, GamePhase, GameState, LoopControl, LoopToken, TickInput,
    TimeSource, tick,
};
use crate::tuning::Tuning;

pub struct Game {
    state: GameState,
    tuning: Tuning,
    scheduler: FrameScheduler,
    loop_control: LoopControl,
    /// Last viewport size handed to `resize`
    viewport: (f32, f32),
    /// Particle cap applied to every new run
    max_particles: usize,
    autopilot: bool,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self::with_viewport(seed, tuning, VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }

    pub fn with_viewport(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
        let tuning = tuning.sanitized();
        let arena = Arena::from_viewport(width, height, &tuning);
        Self {
            state: GameState::with_arena(seed, tuning.clone(), arena),
            max_particles: tuning.max_particles,
            tuning,
            scheduler: FrameScheduler::new(),
            loop_control: LoopControl::default(),
            viewport: (width, height),
            autopilot: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts and tests that need to stage a scenario
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn hud(&self) -> Hud {
        Hud::from_state(&self.state)
    }

    /// Events raised since the last call, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Token of the loop currently allowed to drive frames
    pub fn loop_token(&self) -> Option<LoopToken> {
        self.loop_control.current()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot: {}", enabled);
        }
        self.autopilot = enabled;
    }

    /// Cap particles for this and future runs (0 disables them)
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.state.max_particles = max;
        if self.state.particles.len() > max {
            let excess = self.state.particles.len() - max;
            self.state.particles.drain(..excess);
        }
    }

    // === Lifecycle ===

    /// Begin play from a freshly constructed game
    pub fn start(&mut self) -> GamePhase {
        if self.state.phase == GamePhase::NotStarted {
            self.state.phase = GamePhase::Playing;
            self.scheduler.rebaseline();
            self.loop_control.start();
            log::info!("Game started (seed {})", self.state.seed);
        }
        self.state.phase
    }

    /// Halt the frame loop. No time passes while paused.
    pub fn pause(&mut self) -> GamePhase {
        if self.state.phase == GamePhase::Playing {
            self.state.phase = GamePhase::Paused;
            self.loop_control.cancel();
            log::info!("Paused");
        }
        self.state.phase
    }

    /// Restart the frame loop; the first frame back reports zero elapsed time
    pub fn resume(&mut self) -> GamePhase {
        if self.state.phase == GamePhase::Paused {
            self.state.phase = GamePhase::Playing;
            self.scheduler.rebaseline();
            self.loop_control.start();
            log::info!("Resumed");
        }
        self.state.phase
    }

    pub fn toggle_pause(&mut self) -> GamePhase {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            phase => phase,
        }
    }

    /// Throw the run away and start a new one, seeded from the old run's RNG
    pub fn reset(&mut self) -> GamePhase {
        let seed = self.state.rng.next_u64();
        self.reset_with_seed(seed)
    }

    pub fn reset_with_seed(&mut self, seed: u64) -> GamePhase {
        self.loop_control.cancel();

        let arena = self.state.arena;
        self.state = GameState::with_arena(seed, self.tuning.clone(), arena);
        self.state.max_particles = self.max_particles;
        self.state.phase = GamePhase::Playing;

        self.scheduler.rebaseline();
        self.loop_control.start();
        log::info!("Game reset (seed {})", seed);
        self.state.phase
    }

    /// Rebuild the arena for a new viewport. Safe in any phase.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        let arena = Arena::from_viewport(width, height, &self.tuning);
        log::debug!(
            "Resize {}x{}: arena radius {:.1}",
            width,
            height,
            arena.radius
        );
        self.state.relocate_arena(arena);
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    // === Frames ===

    /// Run one frame at host `timestamp` (ms). Returns whether the loop should
    /// keep going.
    pub fn frame(&mut self, timestamp: f64, input: &TickInput) -> bool {
        if self.state.phase != GamePhase::Playing {
            return false;
        }

        let frame = self.scheduler.advance(timestamp, &self.tuning);
        let input = if self.autopilot {
            autopilot::plan(&self.state, frame.now)
        } else {
            input.clone()
        };

        tick(&mut self.state, &input, &frame);

        if self.state.phase != GamePhase::Playing {
            self.loop_control.cancel();
            return false;
        }
        true
    }

    /// Like [`frame`](Self::frame), but only if `token` belongs to the
    /// current loop
    pub fn frame_for(&mut self, token: LoopToken, timestamp: f64, input: &TickInput) -> bool {
        if !self.loop_control.is_current(token) {
            return false;
        }
        self.frame(timestamp, input)
    }

    /// Run one frame stamped by `clock`
    pub fn frame_with_clock(&mut self, clock: &dyn TimeSource, input: &TickInput) -> bool {
        self.frame(clock.now_ms(), input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ManualClock;

    const DT: f64 = 1000.0 / 60.0;

    #[test]
    fn test_lifecycle_transitions() {
        let mut game = Game::new(1, Tuning::default());
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert!(game.loop_token().is_none());
        assert!(!game.frame(0.0, &TickInput::default()));

        assert_eq!(game.start(), GamePhase::Playing);
        assert!(game.loop_token().is_some());
        assert_eq!(game.pause(), GamePhase::Paused);
        assert_eq!(game.pause(), GamePhase::Paused);
        assert!(game.loop_token().is_none());
        assert_eq!(game.resume(), GamePhase::Playing);
        assert_eq!(game.toggle_pause(), GamePhase::Paused);
        assert_eq!(game.toggle_pause(), GamePhase::Playing);
        // start is a no-op once running
        assert_eq!(game.start(), GamePhase::Playing);
    }

    #[test]
    fn test_pause_freezes_time_and_resume_rebaselines() {
        let mut game = Game::new(1, Tuning::default());
        let clock = ManualClock::new(1000.0);
        game.start();
        for _ in 0..10 {
            game.frame_with_clock(&clock, &TickInput::default());
            clock.advance(DT);
        }
        let before = game.state().game_time_ms;

        game.pause();
        for _ in 0..10 {
            assert!(!game.frame_with_clock(&clock, &TickInput::default()));
            clock.advance(DT);
        }
        assert_eq!(game.state().game_time_ms, before);

        // A long gap while paused does not show up as one huge frame
        clock.advance(30_000.0);
        game.resume();
        game.frame_with_clock(&clock, &TickInput::default());
        assert_eq!(game.state().game_time_ms, before);
        clock.advance(DT);
        game.frame_with_clock(&clock, &TickInput::default());
        assert!((game.state().game_time_ms - before - DT).abs() < 1e-3);
    }

    #[test]
    fn test_stale_loop_cannot_touch_fresh_state() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        let old = game.loop_token().unwrap();
        assert!(game.frame_for(old, 0.0, &TickInput::default()));
        assert!(game.frame_for(old, 100.0, &TickInput::default()));

        game.reset_with_seed(2);
        let fresh_time = game.state().game_time_ms;
        assert!(!game.frame_for(old, 200.0, &TickInput::default()));
        assert_eq!(game.state().game_time_ms, fresh_time);

        let new = game.loop_token().unwrap();
        assert_ne!(old, new);
        assert!(game.frame_for(new, 300.0, &TickInput::default()));
    }

    #[test]
    fn test_reset_gives_fresh_run() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        game.state_mut().score = 500.0;
        game.state_mut().health = 20.0;
        game.state_mut().multiplier = 3.0;
        assert_eq!(game.reset(), GamePhase::Playing);
        let state = game.state();
        assert_eq!(state.score, 0.0);
        assert_eq!(state.health, 100.0);
        assert_eq!(state.multiplier, 1.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.waves.active_wave(), 1);
    }

    #[test]
    fn test_resize_while_paused() {
        let mut game = Game::new(1, Tuning::default());
        game.start();
        game.pause();
        game.resize(1200.0, 900.0);
        assert_eq!(game.state().arena.radius, 400.0);
        assert_eq!(game.state().player.pos, glam::Vec2::new(600.0, 450.0));

        game.resize(-5.0, 0.0);
        assert!(game.state().arena.radius >= game.tuning.min_arena_radius);
        let limit = game.state().arena.limit_for(game.state().player.radius);
        assert!(game.state().player.pos.distance(game.state().arena.center) <= limit + 1e-3);
    }

    #[test]
    fn test_particle_cap_applies_across_reset() {
        let mut game = Game::new(1, Tuning::default());
        game.set_max_particles(0);
        game.reset_with_seed(3);
        assert_eq!(game.state().max_particles, 0);
    }

    #[test]
    fn test_autopilot_survives_a_while() {
        let mut game = Game::new(1234, Tuning::default());
        game.set_autopilot(true);
        game.start();
        let clock = ManualClock::new(0.0);
        for _ in 0..(60 * 20) {
            game.frame_with_clock(&clock, &TickInput::default());
            clock.advance(DT);
        }
        let state = game.state();
        assert!((0.0..=100.0).contains(&state.health));
        assert!(state.game_time_ms > 0.0);
    }
}
