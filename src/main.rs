//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use road_rush::audio::{AudioManager, SoundEffect};
    use road_rush::consts::*;
    use road_rush::renderer::{RenderState, build_scene, css_viewport};
    use road_rush::sim::{GameEvent, GameState, TickInput, tick};
    use road_rush::tracking::HAND_SLOT;
    use road_rush::{GameConfig, QualityPreset, Settings, StartupError, Tuning};

    const CANVAS_ID: &str = "canvas";
    const STARTUP_ERROR_ID: &str = "startup-error";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        tuning: Tuning,
        settings: Settings,
        render_state: RenderState,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Score last written to the HUD
        shown_score: Option<u64>,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                // Latest detection is read once per tick, never awaited
                let input =
                    TickInput::from_hand(HAND_SLOT.latest_fingertip_x(), &self.tuning.player);
                tick(&mut self.state, &input, &self.tuning);
                self.handle_events();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Drop backlog the substep cap could not absorb
            if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
                self.accumulator = 0.0;
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

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Scored { score, lateral } => {
                        self.audio.play(SoundEffect::Scored);
                        log::debug!("Scored at lateral {:.1}, score now {}", lateral, score);
                    }
                    GameEvent::ObstacleSpawned { id, lateral } => {
                        log::debug!("Obstacle {} spawned at lateral {:.1}", id, lateral);
                    }
                    GameEvent::ObstacleMissed { id } => {
                        log::debug!("Obstacle {} passed the player", id);
                    }
                }
            }
        }

        /// Keep the surface matched to the canvas's CSS size
        fn sync_canvas_size(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width > 0 && height > 0 && (width, height) != self.render_state.size {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
                log::info!("Canvas resized to {}x{}", width, height);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let scene = build_scene(
                &self.state,
                &self.tuning,
                &self.settings,
                css_viewport(self.render_state.size, dpr),
            );
            match self.render_state.render(&scene) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.shown_score != Some(self.state.score) {
                if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                self.shown_score = Some(self.state.score);
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }

        fn toggle_mute(&mut self) {
            let muted = !self.audio.is_muted();
            self.audio.set_muted(muted);
            self.settings.muted = muted;
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Road Rush starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
            show_startup_error(&e);
        }
    }

    async fn start() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::Environment("no window"))?;
        let document = window
            .document()
            .ok_or(StartupError::Environment("no document"))?;

        let mut config = GameConfig::load(&document)?;
        if let Some(quality) = quality_from_query(&window) {
            log::info!("Quality override from URL: {}", quality.as_str());
            config.settings.quality = quality;
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into().ok())
            .ok_or(StartupError::MissingCanvas(CANVAS_ID))?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let audio = AudioManager::new(&config.settings)?;

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, config.settings.quality).await?;

        let seed = js_sys::Date::now() as u64;
        let GameConfig { tuning, settings } = config;
        let state = GameState::new(seed, &tuning);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            tuning,
            settings,
            render_state,
            audio,
            canvas,
            accumulator: 0.0,
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            shown_score: None,
        }));

        setup_keyboard(game.clone());
        setup_auto_mute(game.clone());

        // Hide loading indicator, show HUD
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        game.borrow().audio.play(SoundEffect::Start);

        // Start game loop
        request_animation_frame(game);

        log::info!("Road Rush running!");
        Ok(())
    }

    /// `?quality=low|medium|high` on the page URL overrides the configured preset
    fn quality_from_query(window: &web_sys::Window) -> Option<QualityPreset> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("quality="))
            .and_then(QualityPreset::parse)
    }

    fn show_startup_error(error: &StartupError) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        if let Some(el) = document.get_element_by_id(STARTUP_ERROR_ID) {
            el.set_text_content(Some(&error.to_string()));
            let _ = el.set_attribute("class", "");
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "m" | "M" => g.toggle_mute(),
                "f" | "F" => g.settings.show_fps = !g.settings.show_fps,
                // Any other key counts as the gesture browsers want before audio
                _ => g.audio.resume(),
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.sync_canvas_size();
            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_mute(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    // Resume from a clean clock rather than fast-forwarding
                    g.last_time = 0.0;
                    g.accumulator = 0.0;
                    if g.settings.mute_on_blur {
                        g.audio.set_muted(true);
                        log::info!("Auto-muted (tab hidden)");
                    }
                } else {
                    let muted = g.settings.muted;
                    g.audio.set_muted(muted);
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                    log::info!("Auto-muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus restores the user's own mute choice
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

/// Detector callback: the page forwards each handPose result list as JSON
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn on_hands(json: &str) {
    if let Err(e) = road_rush::tracking::HAND_SLOT.publish_json(json) {
        log::warn!("Ignoring malformed hand detection: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Road Rush (native) starting...");
    log::info!("Rendering requires the web build - run with `trunk serve`; running a headless session");

    let config = road_rush::GameConfig::default();
    let score = headless::run_session(&config.tuning, 42, 600);
    log::info!("Headless session finished with score {}", score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use road_rush::Tuning;
    use road_rush::sim::{GameEvent, GameState, TickInput, tick};

    /// Run `ticks` ticks with a hand sweeping side to side; returns the score
    pub fn run_session(tuning: &Tuning, seed: u64, ticks: u32) -> u64 {
        let mut state = GameState::new(seed, tuning);
        let center = tuning.player.input_center();
        for t in 0..ticks {
            let phase = t as f32 * 0.05;
            let hand_x = center + phase.sin() * tuning.player.half_width;
            let input = TickInput::from_hand(Some(hand_x), &tuning.player);
            tick(&mut state, &input, tuning);
            let now = state.time_ticks;
            for event in state.drain_events() {
                if let GameEvent::Scored { score, lateral } = event {
                    log::info!("tick {}: scored at {:.1} (score {})", now, lateral, score);
                }
            }
        }
        log::info!(
            "{} buildings, {} stripes, {} obstacles on track",
            state.buildings.len(),
            state.stripes.len(),
            state.obstacles.len()
        );
        state.score
    }
}
