//! Falling entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use falling::Settings;
    use falling::consts::*;
    use falling::renderer::{RenderState, build_scene, screen_to_scene};
    use falling::sim::{GameEvent, GameState, TickInput, TouchSample, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Canvas size in CSS pixels
        canvas_size: Vec2,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed, settings.scene_size(), settings.mode),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                canvas_size: Vec2::ONE,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Pointer position relative to the canvas → touch sample
        fn sample(&self, x: f32, y: f32, time_stamp_ms: f64) -> TouchSample {
            let pos = screen_to_scene(x, y, self.state.scene_size, self.canvas_size);
            TouchSample::new(pos, time_stamp_ms / 1000.0)
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = std::mem::take(&mut self.input);
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::RowSpawned { .. } => log::trace!("{:?}", event),
                    GameEvent::GameOver | GameEvent::Restarted => log::info!("{:?}", event),
                    _ => log::debug!("{:?}", event),
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(&self.state, &self.settings);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update debug HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            set_visible(&document, "hud-nodes", self.settings.show_node_count);
            if self.settings.show_node_count {
                if let Some(el) = document.query_selector("#hud-nodes .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.state.node_count().to_string()));
                }
            }

            set_visible(&document, "game-over", self.state.is_game_over());
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Falling starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        game.borrow_mut().canvas_size = Vec2::new(client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let scene_size = game.borrow().state.scene_size;
        let render_state = RenderState::new(surface, &adapter, width, height, scene_size)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Falling running!");
        Ok(())
    }

    /// Position of a touch relative to the canvas in CSS pixels
    fn touch_offset(canvas: &HtmlCanvasElement, touch: &web_sys::Touch) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    let (x, y) = touch_offset(&canvas_clone, &touch);
                    let sample = g.sample(x, y, event.time_stamp());
                    g.input.touch_down = Some(sample);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut g = game.borrow_mut();
                    let (x, y) = touch_offset(&canvas_clone, &touch);
                    let sample = g.sample(x, y, event.time_stamp());
                    g.input.touch_up = Some(sample);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let sample = g.sample(event.offset_x() as f32, event.offset_y() as f32, event.time_stamp());
                g.input.touch_down = Some(sample);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let sample = g.sample(event.offset_x() as f32, event.offset_y() as f32, event.time_stamp());
                g.input.touch_up = Some(sample);
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use falling::Settings;
    use falling::consts::SIM_DT;
    use falling::sim::{GameMode, GameState, TickInput, TouchSample, tick};
    use glam::Vec2;

    env_logger::init();
    log::info!("Falling (native) starting...");
    log::info!("Native mode runs a scripted headless session; use `trunk serve` to play");

    let path = std::env::args().nth(1);
    let settings = Settings::load_file(path.as_deref());
    let seed = settings.seed.unwrap_or(1);
    let mut state = GameState::new(seed, settings.scene_size(), settings.mode);

    let run = |state: &mut GameState, secs: f32| {
        let ticks = (secs / SIM_DT).round() as u32;
        for _ in 0..ticks {
            tick(state, &TickInput::default(), SIM_DT);
            if state.is_game_over() {
                break;
            }
        }
        for event in state.drain_events() {
            log::info!("{:?}", event);
        }
    };

    let gesture = |state: &mut GameState, from: Vec2, to: Vec2, held: f64| {
        let start = state.time_secs as f64;
        tick(
            state,
            &TickInput {
                touch_down: Some(TouchSample::new(from, start)),
                touch_up: None,
            },
            SIM_DT,
        );
        tick(
            state,
            &TickInput {
                touch_down: None,
                touch_up: Some(TouchSample::new(to, start + held)),
            },
            SIM_DT,
        );
    };

    let center = state.scene_size * 0.5;
    run(&mut state, 1.0);

    match settings.mode {
        GameMode::Orientation => {
            gesture(&mut state, center, center - Vec2::new(0.0, 120.0), 0.15);
            run(&mut state, 1.0);
            gesture(&mut state, Vec2::new(80.0, center.y), Vec2::new(80.0, center.y), 0.05);
            run(&mut state, 1.0);
            gesture(&mut state, center, center + Vec2::new(120.0, 0.0), 0.15);
        }
        GameMode::Grapple => {
            gesture(&mut state, center, center + Vec2::new(0.0, -120.0), 0.15);
            run(&mut state, 0.3);
            gesture(&mut state, center, center, 0.05);
            run(&mut state, 1.0);
            gesture(&mut state, center, center + Vec2::new(120.0, 0.0), 0.15);
        }
    }

    run(&mut state, 30.0);

    if let Some(button) = state.overlay().map(|o| o.restart_button.center()) {
        log::info!("Game over after {:.1}s, tapping restart", state.time_secs);
        gesture(&mut state, button, button, 0.05);
        run(&mut state, 1.0);
    }

    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
