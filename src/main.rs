//! Neon Arena entry point
//!
//! In the browser this sets up the canvas, input and the frame loop. Natively
//! it runs a headless autopilot session on a manual clock and reports the
//! result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use neon_arena::audio::AudioManager;
    use neon_arena::input::{Action, KeyState};
    use neon_arena::sim::{GamePhase, LoopToken, ParticleColor};
    use neon_arena::{Game, Hud, Settings, Tuning};

    const BACKGROUND: &str = "#0a0a14";
    const GRID: &str = "rgba(0, 255, 255, 0.08)";
    const GRID_SPACING: f64 = 40.0;
    const ARENA_WALL: &str = "#00ffff";
    const PLAYER: &str = "#ff00ff";
    const PLAYER_DASH: &str = "#ffffff";
    const ENEMY: &str = "#ff3355";
    const REWARD: &str = "#33ff88";

    fn particle_color(color: ParticleColor) -> &'static str {
        match color {
            ParticleColor::Enemy => ENEMY,
            ParticleColor::Player => PLAYER,
            ParticleColor::Reward => REWARD,
        }
    }

    /// Everything the page needs between callbacks
    struct App {
        game: Game,
        keys: KeyState,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        document: Document,
        /// Last values written to the DOM, to skip redundant updates
        last_hud: Option<Hud>,
    }

    impl App {
        /// One animation frame. Returns whether the loop should continue.
        fn step(&mut self, token: LoopToken, time: f64) -> bool {
            let input = self.keys.take_input();
            let running = self.game.frame_for(token, time, &input);

            let events = self.game.drain_events();
            self.audio.play_events(&events);

            self.render(time);
            self.update_hud();
            if self.game.phase() == GamePhase::Ended {
                self.show_game_over();
            }
            running
        }

        fn fit_canvas(&self) -> (f32, f32) {
            let width = self.canvas.client_width().max(0) as u32;
            let height = self.canvas.client_height().max(0) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            (width as f32, height as f32)
        }

        // === Rendering ===

        fn render(&self, time: f64) {
            let ctx = &self.ctx;
            let width = self.canvas.width() as f64;
            let height = self.canvas.height() as f64;

            ctx.set_global_alpha(1.0);
            ctx.set_fill_style_str(BACKGROUND);
            ctx.fill_rect(0.0, 0.0, width, height);

            self.draw_grid(width, height, time);

            let state = self.game.state();

            ctx.set_stroke_style_str(ARENA_WALL);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            let _ = ctx.arc(
                state.arena.center.x as f64,
                state.arena.center.y as f64,
                state.arena.radius as f64,
                0.0,
                TAU,
            );
            ctx.stroke();

            for particle in &state.particles {
                ctx.set_global_alpha(particle.alpha.clamp(0.0, 1.0) as f64);
                self.fill_circle(particle.pos, particle.radius, particle_color(particle.color));
            }
            ctx.set_global_alpha(1.0);

            for reward in &state.rewards {
                // Pulse so pickups stand out from particles
                let pulse = if self.settings.reduced_motion {
                    1.0
                } else {
                    1.0 + 0.15 * (time / 150.0).sin() as f32
                };
                ctx.set_global_alpha(reward.opacity() as f64);
                self.fill_circle(reward.pos, reward.radius * pulse, REWARD);
            }
            ctx.set_global_alpha(1.0);

            for enemy in &state.enemies {
                self.fill_circle(enemy.pos, enemy.radius, ENEMY);
            }

            let player = &state.player;
            let color = if player.dashing { PLAYER_DASH } else { PLAYER };
            self.fill_circle(player.pos, player.radius, color);
        }

        fn draw_grid(&self, width: f64, height: f64, time: f64) {
            let ctx = &self.ctx;
            let offset = if self.settings.reduced_motion {
                0.0
            } else {
                (time / 50.0) % GRID_SPACING
            };

            ctx.set_stroke_style_str(GRID);
            ctx.set_line_width(1.0);
            ctx.begin_path();
            let mut x = offset;
            while x < width {
                ctx.move_to(x, 0.0);
                ctx.line_to(x, height);
                x += GRID_SPACING;
            }
            let mut y = offset;
            while y < height {
                ctx.move_to(0.0, y);
                ctx.line_to(width, y);
                y += GRID_SPACING;
            }
            ctx.stroke();
        }

        fn fill_circle(&self, pos: glam::Vec2, radius: f32, color: &str) {
            self.ctx.set_fill_style_str(color);
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(pos.x as f64, pos.y as f64, radius.max(0.0) as f64, 0.0, TAU);
            self.ctx.fill();
        }

        // === DOM ===

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn update_hud(&mut self) {
            let hud = self.game.hud();
            if self.last_hud == Some(hud) {
                return;
            }
            self.set_text("score", &hud.score_text());
            self.set_text("multiplier", &hud.multiplier_text());
            self.set_text("health", &hud.health_text());
            self.set_text("wave", &hud.wave.to_string());
            self.last_hud = Some(hud);
        }

        fn show_game_over(&self) {
            self.set_text("final-score", &self.game.hud().score_text());
            self.set_visible("game-over", true);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Neon Arena starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let ctx = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("Canvas context is not 2d");
                    return;
                }
            },
            _ => {
                log::error!("Failed to get 2d context");
                return;
            }
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, Tuning::default());
        game.set_max_particles(settings.max_particles());

        let app = Rc::new(RefCell::new(App {
            game,
            keys: KeyState::new(),
            audio: AudioManager::from_settings(&settings),
            settings,
            canvas,
            ctx,
            document,
            last_hud: None,
        }));

        {
            let mut a = app.borrow_mut();
            let (w, h) = a.fit_canvas();
            a.game.resize(w, h);
            a.game.start();
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(app.clone());
        setup_restart_button(app.clone());
        setup_resize(app.clone());
        setup_auto_pause(app.clone());

        start_loop(app);

        log::info!("Neon Arena running!");
    }

    /// Schedule frames for whatever loop the game currently considers live
    fn start_loop(app: Rc<RefCell<App>>) {
        let token = app.borrow().game.loop_token();
        if let Some(token) = token {
            request_animation_frame(app, token);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>, token: LoopToken) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            let keep_going = app.borrow_mut().step(token, time);
            if keep_going {
                request_animation_frame(app, token);
            }
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn toggle_pause(app: &Rc<RefCell<App>>) {
        let phase = {
            let mut a = app.borrow_mut();
            a.keys.clear();
            let phase = a.game.toggle_pause();
            a.set_visible("pause-overlay", phase == GamePhase::Paused);
            phase
        };
        if phase == GamePhase::Playing {
            start_loop(app.clone());
        }
    }

    fn restart(app: &Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            a.keys.clear();
            a.game.reset();
            a.last_hud = None;
            a.set_visible("game-over", false);
            a.set_visible("pause-overlay", false);
        }
        start_loop(app.clone());
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let action = {
                    let mut a = app.borrow_mut();
                    a.audio.resume();
                    a.keys.key_down(&event.key())
                };
                match action {
                    Some(Action::Pause) => toggle_pause(&app),
                    Some(Action::Mute) => {
                        let mut a = app.borrow_mut();
                        let muted = a.settings.toggle_mute();
                        let settings = a.settings.clone();
                        a.audio.apply_settings(&settings);
                        settings.save();
                        log::info!("Muted: {}", muted);
                    }
                    Some(Action::Autopilot) => {
                        let mut a = app.borrow_mut();
                        let enabled = !a.game.autopilot();
                        a.game.set_autopilot(enabled);
                    }
                    Some(_) => event.prevent_default(),
                    None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                app.borrow_mut().keys.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                restart(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let (w, h) = a.fit_canvas();
            a.game.resize(w, h);
            // Redraw now so a paused game does not show a stretched frame
            a.render(js_sys::Date::now());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let auto_pause = {
            let app = app.clone();
            move |reason: &str| {
                let should_pause = {
                    let a = app.borrow();
                    a.settings.pause_on_blur && a.game.phase() == GamePhase::Playing
                };
                if should_pause {
                    toggle_pause(&app);
                    log::info!("Auto-paused ({})", reason);
                }
            }
        };

        // Visibility change (tab switch, minimize)
        {
            let auto_pause = auto_pause.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().keys.clear();
                auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_host::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run: `neon-arena [seed] [seconds] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_arena::audio::AudioManager;
    use neon_arena::sim::{GamePhase, ManualClock, TickInput};
    use neon_arena::{Game, Settings, Tuning};

    env_logger::init();
    log::info!("Neon Arena (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);
    let seconds = args.next().and_then(|s| s.parse().ok()).unwrap_or(60u32);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::error!("Bad tuning file {}: {}", path, e);
                Tuning::default()
            }),
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let frame_ms = tuning.target_frame_ms as f64;
    let settings = Settings::load();
    let audio = AudioManager::from_settings(&settings);

    let mut game = Game::new(seed, tuning);
    game.set_max_particles(settings.max_particles());
    game.set_autopilot(true);
    game.start();

    let clock = ManualClock::new(0.0);
    let total_frames = (seconds as f64 * 1000.0 / frame_ms).ceil() as u64;
    let report_every = (10_000.0 / frame_ms).round().max(1.0) as u64;

    for frame in 0..total_frames {
        let running = game.frame_with_clock(&clock, &TickInput::default());
        audio.play_events(&game.drain_events());
        if frame % report_every == 0 {
            log::info!("t={:.0}s {}", game.state().game_time_ms / 1000.0, game.hud());
        }
        if !running {
            break;
        }
        clock.advance(frame_ms);
    }

    let outcome = match game.phase() {
        GamePhase::Ended => "died",
        _ => "survived",
    };
    println!(
        "seed {}: {} after {:.1}s | {}",
        seed,
        outcome,
        game.state().game_time_ms / 1000.0,
        game.hud()
    );
}
