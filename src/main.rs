#[cfg(not(target_arch = "wasm32"))]
use frog_dodge::cli_renderer::CliEvent;
#[cfg(not(target_arch = "wasm32"))]
use frog_dodge::{
    CliRenderer, ConfigError, Engine, FlappyConfig, FlappyGame, FrameRequest, Game, GameConfig,
    GameState, HostCommand, SpawnTimer,
};
#[cfg(not(target_arch = "wasm32"))]
use std::io;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

// ~60 frames per second, like a display refresh
#[cfg(not(target_arch = "wasm32"))]
const FRAME_TIME: Duration = Duration::from_millis(16);

#[cfg(not(target_arch = "wasm32"))]
const POLL_TIMEOUT: Duration = Duration::from_millis(4);

#[cfg(not(target_arch = "wasm32"))]
struct Options {
    flappy: bool,
    config_text: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
const USAGE: &str = "usage: frog-dodge-cli [--flappy] [CONFIG.toml]";

/// Splits the command line into the variant flag and an optional config path.
#[cfg(not(target_arch = "wasm32"))]
fn parse_args(args: impl IntoIterator<Item = String>) -> io::Result<(bool, Option<String>)> {
    let mut flappy = false;
    let mut config_path = None;
    for arg in args {
        match arg.as_str() {
            "--flappy" => flappy = true,
            flag if flag.starts_with("--") => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unknown option {}\n{}", flag, USAGE),
                ));
            }
            _ => config_path = Some(arg),
        }
    }
    Ok((flappy, config_path))
}

#[cfg(not(target_arch = "wasm32"))]
impl Options {
    fn from_args() -> io::Result<Self> {
        let (flappy, config_path) = parse_args(std::env::args().skip(1))?;
        let config_text = config_path.map(std::fs::read_to_string).transpose()?;
        Ok(Self { flappy, config_text })
    }

    /// Canvas size always follows the terminal; everything else may come
    /// from the TOML file.
    fn build(&self, width: f64, height: f64) -> Result<Box<dyn Engine>, ConfigError> {
        if self.flappy {
            let config = match &self.config_text {
                Some(text) => FlappyConfig::from_toml(text)?,
                None => FlappyConfig::default(),
            };
            Ok(Box::new(FlappyGame::new(config.with_canvas(width, height))?))
        } else {
            let config = match &self.config_text {
                Some(text) => GameConfig::from_toml(text)?,
                None => GameConfig::default(),
            };
            Ok(Box::new(Game::new(config.with_canvas(width, height))?))
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn status_line(state: GameState) -> &'static str {
    match state {
        GameState::NotStarted => "Ready",
        GameState::Running => "Running",
        GameState::Paused => "Paused - Esc to resume",
        GameState::Over => "Game over",
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> io::Result<()> {
    env_logger::init();

    let options = Options::from_args()?;
    let invalid = |e: ConfigError| io::Error::new(io::ErrorKind::InvalidInput, e);

    let (term_width, term_height) = crossterm::terminal::size()?;
    let (cols, rows) = CliRenderer::play_area(term_width, term_height);

    let mut renderer = CliRenderer::new(cols, rows);
    if options.flappy {
        renderer = renderer.with_title("F L A P");
    }
    let (width, height) = renderer.canvas_size();
    let mut game = options.build(width, height).map_err(invalid)?;

    renderer.init()?;

    let mut frames = FrameRequest::new();
    let mut spawn_timer = game.spawn_interval_ms().map(SpawnTimer::new);
    let session = Instant::now();
    let mut clock_ms = 0u64;
    let mut last_frame = Instant::now();
    let mut dirty = true;
    let mut shown = None;

    game.redraw(&mut renderer);

    loop {
        let mut inputs = renderer.expire_held();
        match renderer.poll_event(POLL_TIMEOUT)? {
            Some(CliEvent::Input(input)) => inputs.push(input),
            Some(CliEvent::Resize(term_width, term_height)) => {
                let (cols, rows) = CliRenderer::play_area(term_width, term_height);
                renderer.resize(cols, rows);
                let (width, height) = renderer.canvas_size();
                game.handle_resize(width, height);
                game.redraw(&mut renderer);
                dirty = true;
            }
            None => {}
        }

        for input in inputs {
            match game.handle_input(input, &mut frames) {
                Some(HostCommand::Quit) => {
                    renderer.cleanup()?;
                    return Ok(());
                }
                Some(HostCommand::Reload) => {
                    let (width, height) = renderer.canvas_size();
                    game = options.build(width, height).map_err(invalid)?;
                    frames = FrameRequest::new();
                    spawn_timer = game.spawn_interval_ms().map(SpawnTimer::new);
                    game.redraw(&mut renderer);
                    dirty = true;
                }
                None => {}
            }
        }

        // The spawn timer runs on wall-clock time for the whole session
        let now_ms = session.elapsed().as_millis() as u64;
        if let Some(timer) = spawn_timer.as_mut() {
            for _ in 0..timer.advance(now_ms - clock_ms) {
                game.spawn_tick();
            }
        }
        clock_ms = now_ms;

        if frames.is_pending() && last_frame.elapsed() >= FRAME_TIME {
            frames.take();
            last_frame = Instant::now();
            game.frame(&mut renderer, &mut frames);
            dirty = true;
        }

        let state = game.state();
        if dirty || shown != Some(state) {
            renderer.present(game.overlays(), status_line(state))?;
            shown = Some(state);
            dirty = false;
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
