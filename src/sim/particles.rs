//! Cosmetic particle bursts
//!
//! Particles never feed back into gameplay, so the cap can be lowered (or set
//! to zero) without changing a run's outcome.

use glam::Vec2;
use rand::Rng;

use super::scheduler::FrameTime;
use super::state::{GameState, Particle, ParticleColor};
use crate::polar_to_cartesian;

/// Emit a burst of particles flying outward from `pos`
pub fn spawn_burst(state: &mut GameState, pos: Vec2, color: ParticleColor) {
    if state.max_particles == 0 {
        return;
    }

    let tuning = &state.tuning;
    for _ in 0..tuning.particle_burst {
        if state.particles.len() >= state.max_particles {
            // Remove oldest particles to make room
            state.particles.remove(0);
        }

        let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
        let speed =
            tuning.particle_min_speed + state.rng.random::<f32>() * tuning.particle_speed_spread;
        let radius =
            tuning.particle_min_radius + state.rng.random::<f32>() * tuning.particle_radius_spread;

        state.particles.push(Particle {
            pos,
            vel: polar_to_cartesian(speed, angle),
            radius,
            color,
            alpha: 1.0,
        });
    }
}

/// Drift and fade; drop particles that have faded out
pub fn update_particles(state: &mut GameState, frame: &FrameTime) {
    let fade = state.tuning.particle_fade * frame.time_scale;
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * frame.time_scale;
        particle.alpha -= fade;
    }
    state.particles.retain(|p| p.alpha > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_burst_count_and_speed() {
        let mut state = GameState::new(2, Tuning::default());
        spawn_burst(&mut state, Vec2::new(50.0, 50.0), ParticleColor::Enemy);
        assert_eq!(state.particles.len(), 10);
        for p in &state.particles {
            let speed = p.vel.length();
            assert!((1.0 - 1e-4..=3.0 + 1e-4).contains(&speed));
            assert!((2.0..=5.0).contains(&p.radius));
            assert_eq!(p.alpha, 1.0);
        }
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = GameState::new(2, Tuning::default());
        spawn_burst(&mut state, Vec2::ZERO, ParticleColor::Reward);
        let frame = FrameTime::fixed(0.0, 1000.0 / 60.0, 1000.0 / 60.0);
        for _ in 0..49 {
            update_particles(&mut state, &frame);
        }
        assert_eq!(state.particles.len(), 10);
        // 50 * 0.02 reaches zero (allowing for float drift, a couple more frames)
        for _ in 0..3 {
            update_particles(&mut state, &frame);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(2, Tuning::default());
        state.max_particles = 15;
        spawn_burst(&mut state, Vec2::ZERO, ParticleColor::Player);
        spawn_burst(&mut state, Vec2::ONE, ParticleColor::Player);
        assert_eq!(state.particles.len(), 15);
        assert_eq!(state.particles[14].pos, Vec2::ONE);

        state.max_particles = 0;
        state.particles.clear();
        spawn_burst(&mut state, Vec2::ZERO, ParticleColor::Player);
        assert!(state.particles.is_empty());
    }
}
