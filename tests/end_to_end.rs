//! Whole-game scenarios driven through the public `Game` API on a manual clock

use glam::Vec2;
use neon_arena::Game;
use neon_arena::Tuning;
use neon_arena::sim::rewards::spawn_reward;
use neon_arena::sim::{Enemy, GameEvent, GamePhase, ManualClock, Reward, TickInput};

const DT: f64 = 1000.0 / 60.0;

/// No random spawns, drops or healing: only what a test places exists
fn scripted_tuning() -> Tuning {
    Tuning {
        spawn_chance: 0.0,
        reward_spawn_chance: 0.0,
        regen_chance: 0.0,
        ..Tuning::default()
    }
}

fn started_game(seed: u64) -> Game {
    let mut game = Game::new(seed, scripted_tuning());
    game.start();
    game.drain_events();
    game
}

fn park_enemy(game: &mut Game, offset: Vec2) -> Vec2 {
    let state = game.state_mut();
    let pos = state.player.pos + offset;
    let radius = state.tuning.enemy_radius;
    state.enemies.push(Enemy {
        pos,
        speed: 0.0,
        radius,
    });
    pos
}

#[test]
fn single_hit_damages_and_knocks_back() {
    let mut game = started_game(7);
    let start = game.state().player.pos;
    let enemy_pos = park_enemy(&mut game, Vec2::new(20.0, 0.0));
    game.state_mut().multiplier = 2.5;

    // First frame after start advances no time but still resolves contacts
    assert!(game.frame(1000.0, &TickInput::default()));

    let state = game.state();
    assert_eq!(state.health, 95.0);
    assert_eq!(state.multiplier, 1.0);
    assert_eq!(state.game_time_ms, 0.0);

    let moved = state.player.pos - start;
    assert!(moved.length() > 0.0);
    // Pushed away from the enemy
    assert!(state.player.pos.distance(enemy_pos) > start.distance(enemy_pos));

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::DamageTaken { amount: 5.0 }));
}

#[test]
fn reward_pays_frozen_value_and_bumps_multiplier() {
    let mut game = started_game(8);
    {
        let state = game.state_mut();
        state.multiplier = 1.5;
        let pos = state.player.pos;
        state.rewards.push(Reward {
            pos,
            radius: 8.0,
            value: 12.0,
            ttl_ms: 3000.0,
        });
    }

    assert!(game.frame(0.0, &TickInput::default()));

    let state = game.state();
    assert_eq!(state.score, 12.0);
    assert!((state.multiplier - 1.6).abs() < 1e-5);
    assert!(state.rewards.is_empty());
    assert_eq!(game.hud().multiplier_text(), "1.6x");
}

#[test]
fn reward_keeps_spawn_value_after_multiplier_reset() {
    let mut game = started_game(11);
    park_enemy(&mut game, Vec2::new(20.0, 0.0));
    {
        let state = game.state_mut();
        state.multiplier = 2.0;
        spawn_reward(state);
        assert_eq!(state.rewards[0].value, 20.0);
        // Out of reach while the hit lands
        state.rewards[0].pos = state.player.pos + Vec2::new(0.0, -150.0);
    }

    assert!(game.frame(0.0, &TickInput::default()));
    assert_eq!(game.state().multiplier, 1.0);
    assert_eq!(game.state().health, 95.0);
    assert_eq!(game.state().score, 0.0);

    {
        let state = game.state_mut();
        state.enemies.clear();
        state.rewards[0].pos = state.player.pos;
    }
    assert!(game.frame(DT, &TickInput::default()));

    let state = game.state();
    // Paid at the multiplier it spawned under, not the current 1.0
    assert_eq!(state.score, 20.0);
    assert!((state.multiplier - 1.1).abs() < 1e-5);
    assert!(state.rewards.is_empty());
}

#[test]
fn dash_through_enemy_scores_with_multiplier() {
    let mut game = started_game(9);
    park_enemy(&mut game, Vec2::new(0.0, 15.0));
    game.state_mut().multiplier = 2.0;

    let input = TickInput {
        dash: true,
        ..TickInput::default()
    };
    assert!(game.frame(500.0, &input));

    let state = game.state();
    assert!(state.enemies.is_empty());
    assert_eq!(state.score, 100.0);
    assert_eq!(state.health, 100.0);
    assert!(state.player.dashing);

    let events = game.drain_events();
    assert!(events.contains(&GameEvent::DashStarted));
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
    );
}

#[test]
fn run_ends_exactly_once() {
    let mut game = started_game(10);
    park_enemy(&mut game, Vec2::new(0.0, -20.0));
    game.state_mut().health = 3.0;

    assert!(!game.frame(0.0, &TickInput::default()));
    assert_eq!(game.phase(), GamePhase::Ended);
    assert_eq!(game.state().health, 0.0);
    assert!(game.loop_token().is_none());

    let ended = game
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::GameEnded { .. }))
        .count();
    assert_eq!(ended, 1);

    let frozen_time = game.state().game_time_ms;
    for i in 1..10 {
        assert!(!game.frame(i as f64 * DT, &TickInput::default()));
    }
    assert!(game.drain_events().is_empty());
    assert_eq!(game.state().game_time_ms, frozen_time);
    assert_eq!(game.hud().health_text(), "0%");

    // Restart goes straight back to playing with a fresh run
    assert_eq!(game.reset(), GamePhase::Playing);
    assert_eq!(game.state().health, 100.0);
    assert!(game.loop_token().is_some());
}

#[test]
fn same_seed_same_run() {
    let play = |seed: u64| {
        let mut game = Game::new(seed, Tuning::default());
        game.start();
        let clock = ManualClock::new(0.0);
        let mut events = Vec::new();
        for i in 0..(60 * 30) {
            let input = TickInput {
                left: i % 120 < 60,
                right: i % 120 >= 60,
                dash: i % 90 == 0,
                ..TickInput::default()
            };
            if !game.frame_with_clock(&clock, &input) {
                break;
            }
            events.extend(game.drain_events());
            clock.advance(DT);
        }
        (game.hud(), game.state().player.pos, events)
    };

    let (hud_a, pos_a, events_a) = play(99);
    let (hud_b, pos_b, events_b) = play(99);
    assert_eq!(hud_a, hud_b);
    assert_eq!(pos_a, pos_b);
    assert_eq!(events_a, events_b);
}

#[test]
fn waves_grow_as_they_are_cleared() {
    let mut game = Game::new(3, Tuning::default());
    game.start();
    let clock = ManualClock::new(0.0);

    let mut started = Vec::new();
    for _ in 0..(60 * 120) {
        // Keep the player alive so the director keeps running
        game.state_mut().health = 100.0;
        // Clear the arena as soon as an enemy appears
        game.state_mut().enemies.clear();
        game.frame_with_clock(&clock, &TickInput::default());
        for event in game.drain_events() {
            if let GameEvent::WaveStarted { wave, enemies } = event {
                started.push((wave, enemies));
            }
        }
        clock.advance(DT);
    }

    assert!(started.len() >= 2, "only saw waves {:?}", started);
    for (wave, enemies) in &started {
        assert_eq!(*enemies, 3 + 2 * *wave);
    }
    for pair in started.windows(2) {
        assert_eq!(pair[1].0, pair[0].0 + 1);
    }
}
