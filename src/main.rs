//! Lane Racer entry point
//!
//! Browser: wires the DOM to a session and drives it with requestAnimationFrame.
//! Native: runs a seeded autopilot demo on a virtual 60 Hz clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use lane_racer::audio::{AudioCue, AudioManager, AudioSink};
    use lane_racer::driver::{FrameScheduler, LoopDriver};
    use lane_racer::persistence::LocalStorageStore;
    use lane_racer::platform::{
        Command, SwipeTracker, button_command, key_command, pause_label,
    };
    use lane_racer::renderer::CanvasRenderer;
    use lane_racer::sim::{GameEvent, GamePhase, Intent};
    use lane_racer::{FrameView, Session, Settings, Tuning};

    /// Audio manager shared by the session and the mute button
    #[derive(Clone)]
    struct SharedAudio(Rc<RefCell<AudioManager>>);

    impl AudioSink for SharedAudio {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().play(cue);
        }

        fn set_boosting(&mut self, boosting: bool) {
            self.0.borrow_mut().set_boosting(boosting);
        }
    }

    type FrameCallback = Closure<dyn FnMut(f64)>;

    /// requestAnimationFrame as a frame source.
    ///
    /// Owns the callback of the outstanding frame so a cancelled frame frees
    /// it. The previous callback is parked in `fired` because it may still be
    /// running when the next frame is requested from inside it.
    struct RafScheduler {
        app: Weak<RefCell<App>>,
        current: Option<(i32, FrameCallback)>,
        fired: Option<FrameCallback>,
    }

    impl RafScheduler {
        fn new(app: Weak<RefCell<App>>) -> Self {
            Self {
                app,
                current: None,
                fired: None,
            }
        }
    }

    impl FrameScheduler for RafScheduler {
        type Handle = i32;

        fn request_frame(&mut self) -> Option<i32> {
            let window = web_sys::window()?;
            self.fired = self.current.take().map(|(_, callback)| callback);

            let app = self.app.clone();
            let callback = FrameCallback::new(move |_time: f64| {
                if let Some(app) = app.upgrade() {
                    game_loop(&app);
                }
            });
            let handle = window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok()?;
            self.current = Some((handle, callback));
            Some(handle)
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
            if self.current.as_ref().is_some_and(|(h, _)| *h == handle) {
                self.current = None;
            }
        }
    }

    struct App {
        session: Session,
        driver: LoopDriver<RafScheduler>,
        renderer: Option<CanvasRenderer>,
        canvas: HtmlCanvasElement,
        audio: SharedAudio,
        settings: Settings,
        swipe: SwipeTracker,
        autopilot: bool,
        /// Last run ended on a new best
        new_best: bool,
    }

    impl App {
        /// Act on one command, then bring the loop and the screen up to date
        fn command(&mut self, command: Command) {
            match command {
                Command::Intent(intent) => {
                    self.session.apply(intent);
                }
                Command::Start => {
                    // First user gesture: the browser lets audio play from here
                    self.audio.0.borrow().resume();
                    if self.session.start() {
                        self.new_best = false;
                        log::info!("Run started");
                    }
                }
                Command::ToggleMute => {
                    let muted = self.settings.toggle_mute();
                    self.settings.save();
                    self.audio.0.borrow_mut().apply_settings(&self.settings);
                    if !muted && self.session.phase() == GamePhase::Playing {
                        self.audio.play(AudioCue::EngineStart);
                    }
                    log::info!("Muted: {}", muted);
                }
                Command::ToggleAutopilot => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                }
            }
            self.driver.sync(self.session.phase());
            self.present();
        }

        /// Pause a running game when the page loses attention
        fn auto_pause(&mut self, reason: &str) {
            if self.settings.mute_on_blur && self.session.phase() == GamePhase::Playing {
                log::info!("Auto-paused ({})", reason);
                self.command(Command::Intent(Intent::PauseToggle));
            }
        }

        fn resize(&mut self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let width = self.canvas.client_width() as f64;
            let height = self.canvas.client_height() as f64;
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(width, height, dpr);
            }
            self.session.resize(width as f32, height as f32);
            self.present();
        }

        /// Draw the current frame and refresh the HUD
        fn present(&mut self) {
            for event in self.session.take_events() {
                if let GameEvent::GameOver { score, high_score } = event {
                    self.new_best = score > 0 && score == high_score;
                }
            }
            let view = self.session.view();
            if let Some(renderer) = &self.renderer {
                renderer.render(&view, &self.settings);
            }
            update_hud(&view, &self.settings, self.autopilot, self.new_best);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(view: &FrameView, settings: &Settings, autopilot: bool, new_best: bool) {
        let Some(document) = document() else { return };

        set_text(&document, "hud-score", &view.score.to_string());
        set_text(&document, "hud-high", &view.high_score.to_string());
        if let Some(el) = document.get_element_by_id("boost-meter") {
            let class = if view.boosting { "boosting" } else { "" };
            let _ = el.set_attribute("class", class);
            let _ = el.set_attribute("style", &format!("width: {:.0}%", view.boost_level * 100.0));
        }
        set_text(&document, "mute-btn", if settings.muted { "Unmute" } else { "Mute" });
        set_text(&document, "pause-btn", pause_label(view.phase));
        set_visible(&document, "autopilot-badge", autopilot);

        // Overlay: menu, pause and game over share one panel
        let (title, button) = match view.phase {
            GamePhase::Menu => ("Lane Racer", "Start"),
            GamePhase::Paused => ("Paused", "Restart"),
            GamePhase::GameOver => ("Game Over", "Play Again"),
            GamePhase::Playing => ("", ""),
        };
        set_visible(&document, "overlay", view.phase != GamePhase::Playing);
        set_text(&document, "overlay-title", title);
        set_text(&document, "start-btn", button);
        set_visible(&document, "final", view.phase == GamePhase::GameOver);
        set_text(&document, "final-score", &view.score.to_string());
        set_visible(&document, "new-best", view.phase == GamePhase::GameOver && new_best);
    }

    /// Tuning from an inline `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json).and_then(Tuning::validated) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    fn game_loop(app: &Rc<RefCell<App>>) {
        let mut app = app.borrow_mut();
        let app = &mut *app;
        if app.autopilot && app.driver.is_running() {
            app.session.autopilot();
        }
        if app.driver.on_frame(&mut app.session) {
            app.present();
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Lane Racer starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(canvas.clone());
        if renderer.is_none() {
            log::error!("Canvas 2D context unavailable - nothing will be drawn");
        }

        let settings = Settings::load();
        let tuning = load_tuning(&document);
        let swipe = SwipeTracker::new(tuning.swipe_threshold);
        let audio = SharedAudio(Rc::new(RefCell::new(AudioManager::new(&settings))));

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(
            tuning,
            seed,
            Box::new(LocalStorageStore::default()),
            Box::new(audio.clone()),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
            RefCell::new(App {
                session,
                driver: LoopDriver::new(RafScheduler::new(weak.clone())),
                renderer,
                canvas: canvas.clone(),
                audio,
                settings,
                swipe,
                autopilot: false,
                new_best: false,
            })
        });

        setup_keyboard(app.clone());
        setup_touch(&canvas, app.clone());
        setup_buttons(&document, app.clone());
        setup_resize(app.clone());
        setup_auto_pause(&document, app.clone());

        set_visible(&document, "hud", true);
        app.borrow_mut().resize();

        log::info!("Lane Racer ready (seed {})", seed);
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(command) = key_command(&event.key()) else {
                return;
            };
            event.prevent_default();
            // Holding a key only keeps feeding nitro
            if event.repeat() && command != Command::Intent(Intent::Boost) {
                return;
            }
            app.borrow_mut().command(command);
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    app.borrow_mut().swipe.touch_start(touch.client_x() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - swipe or tap
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut app = app.borrow_mut();
                if let Some(intent) = app.swipe.touch_end(touch.client_x() as f32) {
                    app.command(Command::Intent(intent));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch cancel
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                app.borrow_mut().swipe.cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        const BUTTONS: [&str; 7] = [
            "btn-left",
            "btn-right",
            "btn-nitro",
            "pause-btn",
            "start-btn",
            "restart-btn",
            "mute-btn",
        ];

        for id in BUTTONS {
            let (Some(btn), Some(command)) = (document.get_element_by_id(id), button_command(id))
            else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                app.borrow_mut().command(command);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
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
                app.borrow_mut().auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: `lane-racer [seed] [max_ticks] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_racer::audio::LogAudio;
    use lane_racer::persistence::MemoryStore;
    use lane_racer::sim::GameEvent;
    use lane_racer::{LoopDriver, Session, Tuning, VirtualClock};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("{}: {}", path, e);
                    std::process::exit(2);
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => Tuning::default(),
    };

    log::info!("Lane Racer (native) starting...");

    let store = MemoryStore::default();
    let mut session = match Session::new(tuning, seed, Box::new(store.clone()), Box::new(LogAudio))
    {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            std::process::exit(2);
        }
    };
    let mut driver = LoopDriver::new(VirtualClock::default());

    session.start();
    driver.sync(session.phase());

    let mut pickups = 0;
    while driver.is_running() && driver.steps() < max_ticks {
        session.autopilot();
        driver.advance(&mut session, 1);
        pickups += session
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupCollected { .. }))
            .count();
    }
    driver.stop();

    println!(
        "seed {}: score {} in {:.1}s, {} nitro, ended {:?} (best {})",
        seed,
        session.score(),
        driver.scheduler().elapsed().as_secs_f32(),
        pickups,
        session.phase(),
        store.get(),
    );
}
