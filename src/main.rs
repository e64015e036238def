//! Snake Grid entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use snake_grid::input::{InputEvent, InputSender};
    use snake_grid::renderer::{RenderState, VertexCanvas, draw_frame};
    use snake_grid::session::{GameApi, InMemoryApi, Level, Player, SessionCoordinator};
    use snake_grid::sim::{GamePhase, GridLayout, autopilot};
    use snake_grid::{PersonalBests, Settings};

    type SharedApi = Rc<RefCell<InMemoryApi>>;

    /// Browser game instance
    struct Game {
        api: SharedApi,
        player: Player,
        levels: Vec<Level>,
        level_index: usize,
        settings: Settings,
        layout: GridLayout,
        session: Option<SessionCoordinator<SharedApi>>,
        input: Option<InputSender>,
        canvas: VertexCanvas,
        render_state: Option<RenderState>,
        personal_bests: PersonalBests,
        /// Session end already recorded locally
        recorded: bool,
        autopilot: bool,
        /// Settings changed since the last paint
        dirty: bool,
    }

    impl Game {
        fn start_session(&mut self) {
            let Some(level) = self.levels.get(self.level_index).cloned() else {
                log::warn!("No level at index {}", self.level_index);
                return;
            };
            let seed = js_sys::Date::now() as u64;
            match SessionCoordinator::start(self.api.clone(), self.player.id, level, self.layout, seed)
            {
                Ok(session) => {
                    self.input = Some(session.input_sender());
                    self.session = Some(session);
                    self.recorded = false;
                    set_overlay("game-over", false);
                }
                Err(err) => log::error!("Could not start session: {}", err),
            }
        }

        fn send(&self, event: InputEvent) {
            if let Some(input) = &self.input {
                input.send(event);
            }
        }

        fn frame(&mut self, now_ms: f64) {
            let Some(session) = self.session.as_mut() else {
                return;
            };

            if self.autopilot && !session.is_over() {
                if let Some(direction) = autopilot::suggest_direction(session.state()) {
                    session.input_sender().send(InputEvent::Direction(direction));
                }
            }

            session.advance_to(now_ms.max(0.0) as u64);

            if session.take_redraw() | std::mem::take(&mut self.dirty) {
                draw_frame(session.state(), &self.layout, &self.settings, &mut self.canvas);
                if let Some(render_state) = self.render_state.as_mut() {
                    if let Err(err) = render_state.render(&self.canvas) {
                        log::warn!("Frame dropped: {:?}", err);
                    }
                }
                self.update_hud();
            }

            if !self.recorded {
                self.record_end();
            }
        }

        fn update_hud(&self) {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            let state = session.state();
            set_text("score", &state.score.to_string());
            set_text("food", &state.food_eaten.to_string());
            set_text("time", &format!("{}s", state.elapsed_secs));
            set_text("level", &session.context().level.name);
            set_overlay("paused", state.phase == GamePhase::Paused);
        }

        fn record_end(&mut self) {
            let Some(summary) = self.session.as_ref().and_then(|s| s.summary()).cloned() else {
                return;
            };
            self.recorded = true;

            let level_number = self
                .levels
                .get(self.level_index)
                .map(|l| l.level_number)
                .unwrap_or(1);
            if let Some(rank) = self.personal_bests.add_score(
                summary.result.score,
                level_number,
                summary.result.food_eaten,
                js_sys::Date::now(),
            ) {
                log::info!("New personal best #{}", rank);
                self.personal_bests.save();
            }

            set_text("final-score", &summary.result.score.to_string());
            set_text("end-reason", &format!("{:?}", summary.reason));
            set_overlay("game-over", true);

            match self.api.leaderboard(snake_grid::leaderboard::DEFAULT_LEADERBOARD_LIMIT) {
                Ok(board) => {
                    for entry in board {
                        log::info!(
                            "#{} {} - {} points ({} games)",
                            entry.rank,
                            entry.username,
                            entry.total_score,
                            entry.games_played
                        );
                    }
                }
                Err(err) => log::warn!("Leaderboard unavailable: {}", err),
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_overlay(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Snake Grid starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Board fitted to the viewport
        let settings = Settings::load();
        log::info!(
            "Backend configured at {}, playing offline with the in-memory backend",
            settings.api_url
        );
        let viewport_w = window.inner_width()?.as_f64().unwrap_or(800.0) as u32;
        let viewport_h = window.inner_height()?.as_f64().unwrap_or(600.0) as u32;
        let layout = settings.layout_for_viewport(viewport_w, viewport_h);
        let (width, height) = layout.surface_size();
        canvas.set_width(width);
        canvas.set_height(height);
        log::info!(
            "Board {}x{} cells of {}px",
            layout.grid.cols,
            layout.grid.rows,
            layout.cell_size
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        // Offline backend with a local guest
        let api: SharedApi = Rc::new(RefCell::new(InMemoryApi::default()));
        let player = {
            let mut api = api.clone();
            api.create_player("guest", "guest@localhost")
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let levels = api
            .fetch_level_catalog()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            api,
            player,
            levels,
            level_index: 0,
            settings,
            layout,
            session: None,
            input: None,
            canvas: VertexCanvas::new(width, height),
            render_state: Some(render_state),
            personal_bests: PersonalBests::load(),
            recorded: false,
            autopilot: false,
            dirty: false,
        }));
        game.borrow_mut().start_session();

        setup_input_handlers(&window, game.clone())?;
        setup_auto_pause(&window, &document, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Snake Grid running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let key = event.key();
            let mut g = game.borrow_mut();
            let over = g.session.as_ref().is_none_or(|s| s.is_over());

            match key.as_str() {
                "i" | "I" => {
                    g.autopilot = !g.autopilot;
                    log::info!("Autopilot: {}", g.autopilot);
                }
                "r" | "R" | "Enter" if over => g.start_session(),
                "n" | "N" if over => {
                    let next = (g.level_index + 1) % g.levels.len().max(1);
                    g.level_index = next;
                    g.start_session();
                }
                "h" | "H" | "g" | "G" => {
                    if g.settings.toggle_for_key(&key) {
                        g.settings.save();
                        g.dirty = true;
                    }
                }
                _ => {
                    if let Some(input) = InputEvent::from_key(&key) {
                        event.prevent_default();
                        g.send(input);
                    }
                }
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow().send(InputEvent::Pause);
                    log::debug!("Auto-pause requested (tab hidden)");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow().send(InputEvent::Pause);
                log::debug!("Auto-pause requested (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game.borrow_mut().frame(time);
            request_animation_frame(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Snake Grid (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - use `trunk serve` to play");

    if let Err(err) = demo::run() {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless sessions on a simulated clock
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use snake_grid::SnakeError;
    use snake_grid::input::InputEvent;
    use snake_grid::renderer::{VertexCanvas, draw_frame};
    use snake_grid::session::{GameApi, InMemoryApi, SessionCoordinator};
    use snake_grid::settings::Settings;
    use snake_grid::sim::autopilot;

    /// Quit a session that survives this many ticks
    const MAX_DEMO_TICKS: u64 = 2_000;
    const DEMO_LEVELS: usize = 3;

    pub fn run() -> Result<(), SnakeError> {
        let settings = Settings::default();
        let layout = settings.layout_for_viewport(1000, 800);
        let mut api = InMemoryApi::default();
        let player = api.create_player("autopilot", "autopilot@localhost")?;
        let levels = api.fetch_level_catalog()?;

        for (seed, level) in (1u64..).zip(levels.into_iter().take(DEMO_LEVELS)) {
            let interval = level.tick_interval_ms;
            let mut session = SessionCoordinator::start(&mut api, player.id, level, layout, seed)?;
            let input = session.input_sender();

            let mut now_ms = 0;
            while !session.is_over() {
                if session.state().time_ticks >= MAX_DEMO_TICKS {
                    input.send(InputEvent::Quit);
                } else if let Some(direction) = autopilot::suggest_direction(session.state()) {
                    input.send(InputEvent::Direction(direction));
                }
                now_ms += interval;
                session.advance_to(now_ms);
            }

            let (w, h) = layout.surface_size();
            let mut canvas = VertexCanvas::new(w, h);
            draw_frame(session.state(), &layout, &settings, &mut canvas);
            log::debug!("Final frame: {} vertices", canvas.vertices().len());

            if let Some(summary) = session.summary() {
                log::info!(
                    "Level {} ({}): {:?}, score {}, length {}, {}s simulated",
                    session.context().level.level_number,
                    session.context().level.name,
                    summary.reason,
                    summary.result.score,
                    session.state().snake.len(),
                    summary.result.elapsed_secs
                );
            }
        }

        for entry in api.leaderboard(snake_grid::leaderboard::DEFAULT_LEADERBOARD_LIMIT)? {
            log::info!(
                "#{} {} - {} points over {} games (best level {})",
                entry.rank,
                entry.username,
                entry.total_score,
                entry.games_played,
                entry.highest_level
            );
        }
        Ok(())
    }
}
