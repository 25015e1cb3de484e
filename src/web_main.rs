use crate::audio::{AudioPlayer, Silence};
use crate::config::{FlappyConfig, GameConfig};
use crate::engine::Engine;
use crate::flappy::FlappyGame;
use crate::game::Game;
use crate::input::{Action, ClickTarget, HostCommand, Input};
use crate::renderer::Sprite;
use crate::schedule::FrameScheduler;
use crate::state::{GameState, Overlays};
use crate::web_renderer::WebRenderer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlAudioElement, HtmlElement, KeyboardEvent};

const CANVAS_ID: &str = "gameCanvas";
const START_BUTTON_ID: &str = "startButton";
const PAUSE_BUTTON_ID: &str = "pauseButton";
const PAUSE_SCREEN_ID: &str = "pauseScreen";
const GAME_OVER_SCREEN_ID: &str = "endGameScreen";

const MUSIC_URL: &str = "assets/music/theme.mp3";
const WELCOME_URL: &str = "assets/images/welcome.png";
const BACKGROUND_URL: &str = "assets/images/background.jpg";
const SPRITE_URLS: &[(Sprite, &str)] = &[
    (Sprite::Player, "assets/images/frog.png"),
    (Sprite::DeadPlayer, "assets/images/frog-dead.png"),
    (Sprite::Obstacle, "assets/images/snake.png"),
];

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.level(), record.args()));
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line),
            log::Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Looping background music.
struct WebAudio {
    element: HtmlAudioElement,
}

impl WebAudio {
    fn new(url: &str) -> Result<Self, JsValue> {
        let element = HtmlAudioElement::new_with_src(url)?;
        element.set_loop(true);
        Ok(Self { element })
    }
}

impl AudioPlayer for WebAudio {
    fn play(&mut self) {
        // Autoplay policies may reject this; the game carries on silently
        if let Err(e) = self.element.play() {
            log::warn!("music did not start: {:?}", e);
        }
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            log::warn!("music did not pause: {:?}", e);
        }
    }
}

/// `requestAnimationFrame`, armed at most once per frame.
struct WebScheduler {
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
    pending: Rc<Cell<bool>>,
}

impl FrameScheduler for WebScheduler {
    fn request_frame(&mut self) {
        if self.pending.get() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(_) => self.pending.set(true),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }
}

struct Session {
    engine: Box<dyn Engine>,
    renderer: WebRenderer,
    scheduler: WebScheduler,
    shown: Option<Overlays>,
}

impl Session {
    fn frame(&mut self) {
        self.engine.frame(&mut self.renderer, &mut self.scheduler);
        self.sync_overlays();
    }

    fn dispatch(&mut self, input: Input) {
        match self.engine.handle_input(input, &mut self.scheduler) {
            Some(HostCommand::Reload) => {
                if let Some(window) = web_sys::window() {
                    if let Err(e) = window.location().reload() {
                        log::error!("reload failed: {:?}", e);
                    }
                }
            }
            Some(HostCommand::Quit) | None => {}
        }
        self.sync_overlays();
    }

    fn resize(&mut self) {
        match self.renderer.fit_to_window() {
            Ok((width, height)) => {
                self.engine.handle_resize(width, height);
                self.engine.redraw(&mut self.renderer);
            }
            Err(e) => log::warn!("resize failed: {:?}", e),
        }
    }

    fn sync_overlays(&mut self) {
        let overlays = self.engine.overlays();
        if self.shown == Some(overlays) {
            return;
        }
        self.shown = Some(overlays);

        set_visible(START_BUTTON_ID, overlays.start_button);
        set_visible(PAUSE_BUTTON_ID, overlays.pause_button);
        set_visible(PAUSE_SCREEN_ID, overlays.pause_screen);
        set_visible(GAME_OVER_SCREEN_ID, overlays.game_over_screen);

        if let Some(button) = element(PAUSE_BUTTON_ID) {
            let label = if overlays.pause_screen { "Resume" } else { "Pause" };
            button.set_inner_text(label);
        }
    }
}

fn element(id: &str) -> Option<HtmlElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

/// Overlay elements are optional; pages without them just skip the toggle.
fn set_visible(id: &str, visible: bool) {
    if let Some(element) = element(id) {
        let display = if visible { "block" } else { "none" };
        if let Err(e) = element.style().set_property("display", display) {
            log::warn!("failed to toggle #{}: {:?}", id, e);
        }
    }
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Keep listener alive
    Ok(())
}

fn listen_click(session: &Rc<RefCell<Session>>, id: &str, target: ClickTarget) -> Result<(), JsValue> {
    let Some(element) = element(id) else {
        log::debug!("no #{} element, skipping click listener", id);
        return Ok(());
    };
    let session = session.clone();
    listen(&element, "click", move |_: web_sys::MouseEvent| {
        session.borrow_mut().dispatch(Input::Click(target));
    })
}

fn setup_listeners(session: &Rc<RefCell<Session>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;

    let keydown_session = session.clone();
    listen(&window, "keydown", move |event: KeyboardEvent| {
        if let Some(action) = Action::from_key(&event.key()) {
            event.prevent_default();
            // Holding a key is one edge, not a stream
            if !event.repeat() {
                keydown_session.borrow_mut().dispatch(Input::Pressed(action));
            }
        }
    })?;

    let keyup_session = session.clone();
    listen(&window, "keyup", move |event: KeyboardEvent| {
        if let Some(action) = Action::from_key(&event.key()) {
            keyup_session.borrow_mut().dispatch(Input::Released(action));
        }
    })?;

    let blur_session = session.clone();
    listen(&window, "blur", move |_: web_sys::Event| {
        blur_session.borrow_mut().dispatch(Input::FocusLost);
    })?;

    let resize_session = session.clone();
    listen(&window, "resize", move |_: web_sys::Event| {
        resize_session.borrow_mut().resize();
    })?;

    let canvas_session = session.clone();
    let canvas = session.borrow().renderer.canvas().clone();
    listen(&canvas, "click", move |_: web_sys::MouseEvent| {
        canvas_session.borrow_mut().dispatch(Input::Click(ClickTarget::Canvas));
    })?;

    listen_click(session, START_BUTTON_ID, ClickTarget::StartButton)?;
    listen_click(session, PAUSE_BUTTON_ID, ClickTarget::PauseButton)?;
    listen_click(session, GAME_OVER_SCREEN_ID, ClickTarget::GameOverOverlay)?;
    Ok(())
}

/// Spawn ticks run for the whole session; the engine ignores them unless
/// running.
fn setup_spawn_timer(session: &Rc<RefCell<Session>>) -> Result<(), JsValue> {
    let Some(period_ms) = session.borrow().engine.spawn_interval_ms() else {
        return Ok(());
    };
    let window = web_sys::window().ok_or("no window")?;
    let session = session.clone();
    let tick = Closure::wrap(Box::new(move || {
        session.borrow_mut().engine.spawn_tick();
    }) as Box<dyn FnMut()>);
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        period_ms.min(i32::MAX as u64) as i32,
    )?;
    tick.forget();
    Ok(())
}

fn build_engine(
    config_json: Option<String>,
    flappy: bool,
    width: f64,
    height: f64,
) -> Result<Box<dyn Engine>, JsValue> {
    let to_js = |e: crate::config::ConfigError| JsValue::from_str(&e.to_string());
    if flappy {
        let config = match config_json {
            Some(text) => FlappyConfig::from_json(&text).map_err(to_js)?,
            None => FlappyConfig::default(),
        };
        Ok(Box::new(
            FlappyGame::new(config.with_canvas(width, height)).map_err(to_js)?,
        ))
    } else {
        let config = match config_json {
            Some(text) => GameConfig::from_json(&text).map_err(to_js)?,
            None => GameConfig::default(),
        };
        let audio: Box<dyn AudioPlayer> = match WebAudio::new(MUSIC_URL) {
            Ok(audio) => Box::new(audio),
            Err(e) => {
                log::warn!("no music: {:?}", e);
                Box::new(Silence)
            }
        };
        let game = Game::new(config.with_canvas(width, height)).map_err(to_js)?;
        Ok(Box::new(game.with_audio(audio)))
    }
}

/// Handle returned to the page script.
#[wasm_bindgen]
pub struct GameHandle {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl GameHandle {
    pub fn start(&self) {
        self.session.borrow_mut().dispatch(Input::Click(ClickTarget::StartButton));
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) {
        self.session.borrow_mut().dispatch(Input::Click(ClickTarget::PauseButton));
    }

    #[wasm_bindgen(js_name = handleResize)]
    pub fn handle_resize(&self, width: f64, height: f64) {
        let mut session = self.session.borrow_mut();
        let session = &mut *session;
        session.engine.handle_resize(width, height);
        session.engine.redraw(&mut session.renderer);
    }

    pub fn state(&self) -> String {
        match self.session.borrow().engine.state() {
            GameState::NotStarted => "not-started",
            GameState::Running => "running",
            GameState::Paused => "paused",
            GameState::Over => "over",
        }
        .to_string()
    }
}

#[wasm_bindgen]
pub fn start_game(config_json: Option<String>, flappy: bool) -> Result<GameHandle, JsValue> {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }

    let title = if flappy { "Flap" } else { "Frog Dodge" };
    let mut renderer = WebRenderer::new(CANVAS_ID, title)?;
    if !flappy {
        renderer.load_welcome(WELCOME_URL)?;
        renderer.load_background(BACKGROUND_URL)?;
        for (sprite, url) in SPRITE_URLS {
            renderer.load_sprite(*sprite, url)?;
        }
    }
    let (width, height) = renderer.fit_to_window()?;
    let engine = build_engine(config_json, flappy, width, height)?;

    let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let pending = Rc::new(Cell::new(false));
    let scheduler = WebScheduler {
        callback: callback.clone(),
        pending: pending.clone(),
    };

    let session = Rc::new(RefCell::new(Session {
        engine,
        renderer,
        scheduler,
        shown: None,
    }));

    let frame_session = session.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        pending.set(false);
        frame_session.borrow_mut().frame();
    }) as Box<dyn FnMut()>));

    setup_listeners(&session)?;
    setup_spawn_timer(&session)?;

    {
        let mut session = session.borrow_mut();
        let session = &mut *session;
        session.engine.redraw(&mut session.renderer);
        session.sync_overlays();
    }

    log::info!("{} ready on a {}x{} canvas", title, width, height);
    Ok(GameHandle { session })
}
