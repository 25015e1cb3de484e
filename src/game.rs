use crate::audio::{AudioPlayer, Silence};
use crate::config::{ConfigError, GameConfig};
use crate::engine::Engine;
use crate::entity::{Collider, Obstacle, Player};
use crate::input::{Action, ClickTarget, HostCommand, Input, InputState};
use crate::renderer::{Renderer, Sprite};
use crate::schedule::FrameScheduler;
use crate::state::GameState;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The falling-obstacle game: a player at the bottom dodging obstacles that
/// drop from the top.
pub struct Game {
    pub config: GameConfig,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub state: GameState,
    pub input: InputState,
    pub background_offset: f64,
    rng: StdRng,
    audio: Box<dyn AudioPlayer>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let player = Player::new(
            config.canvas_width / 2.0 - config.player_width / 2.0,
            config.canvas_height - config.player_height - config.player_bottom_margin,
            config.player_width,
            config.player_height,
            config.player_speed,
        );

        Ok(Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            player,
            obstacles: Vec::new(),
            state: GameState::NotStarted,
            input: InputState::default(),
            background_offset: 0.0,
            rng: StdRng::from_entropy(),
            audio: Box::new(Silence),
            config,
        })
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPlayer>) -> Self {
        self.audio = audio;
        self
    }

    /// Deterministic spawn positions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn resolve_input(&mut self) {
        match self.input.horizontal() {
            -1 => self.player.move_left(),
            1 => self.player.move_right(),
            _ => self.player.stop(),
        }
    }

    fn scroll_background(&mut self) {
        self.background_offset += self.config.background_scroll;
        if self.background_offset >= self.canvas_height {
            self.background_offset = 0.0;
        }
    }

    fn player_sprite(&self) -> Sprite {
        if self.player.dead {
            Sprite::DeadPlayer
        } else {
            Sprite::Player
        }
    }

    fn prune_obstacles(&mut self) {
        if !self.config.prune_offscreen {
            return;
        }
        let before = self.obstacles.len();
        let canvas_height = self.canvas_height;
        self.obstacles.retain(|o| !o.is_below(canvas_height));
        let pruned = before - self.obstacles.len();
        if pruned > 0 {
            debug!("pruned {} obstacles below the canvas", pruned);
        }
    }

    fn end_game(&mut self, renderer: &mut dyn Renderer) {
        if !self.state.end() {
            return;
        }
        info!(
            "game over with {} obstacles on screen, player at x={:.1}",
            self.obstacles.len(),
            self.player.x
        );
        self.audio.pause();
        self.player.dead = true;
        self.redraw(renderer);
    }
}

impl Engine for Game {
    fn state(&self) -> GameState {
        self.state
    }

    fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.state.start() {
            return;
        }
        info!("game started on a {}x{} canvas", self.canvas_width, self.canvas_height);
        self.audio.play();
        scheduler.request_frame();
    }

    fn toggle_pause(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.state.toggle_pause() {
            return;
        }
        if self.state.is_running() {
            info!("resumed");
            self.audio.play();
            scheduler.request_frame();
        } else {
            info!("paused");
            self.audio.pause();
        }
    }

    fn auto_pause(&mut self) {
        if self.state.auto_pause() {
            info!("paused after losing focus");
            self.audio.pause();
        }
    }

    fn handle_input(
        &mut self,
        input: Input,
        scheduler: &mut dyn FrameScheduler,
    ) -> Option<HostCommand> {
        match input {
            Input::Pressed(Action::Start) | Input::Click(ClickTarget::StartButton) => {
                self.start(scheduler)
            }
            Input::Pressed(Action::PauseToggle) | Input::Click(ClickTarget::PauseButton) => {
                self.toggle_pause(scheduler)
            }
            Input::Pressed(action) => self.input.press(action),
            Input::Released(action) => self.input.release(action),
            Input::Click(ClickTarget::GameOverOverlay) if self.state == GameState::Over => {
                return Some(HostCommand::Reload);
            }
            Input::Click(_) => {}
            Input::FocusLost => {
                // The host will not deliver key-ups that happen while unfocused
                self.input = InputState::default();
                self.auto_pause();
            }
            Input::Quit => return Some(HostCommand::Quit),
        }
        None
    }

    fn frame(&mut self, renderer: &mut dyn Renderer, scheduler: &mut dyn FrameScheduler) {
        if !self.state.is_running() {
            return;
        }

        renderer.clear();
        self.scroll_background();
        renderer.draw_background(self.background_offset);

        self.resolve_input();
        self.player.advance(self.canvas_width);
        renderer.draw_sprite(self.player_sprite(), self.player.bounds());

        let player = self.player.bounds();
        let mut hit = false;
        for obstacle in &mut self.obstacles {
            obstacle.fall();
            renderer.draw_sprite(Sprite::Obstacle, obstacle.bounds());
            if obstacle.bounds().overlaps(&player) {
                hit = true;
            }
        }
        trace!(
            "frame: player x={:.1}, {} obstacles",
            self.player.x,
            self.obstacles.len()
        );

        self.prune_obstacles();

        if hit {
            self.end_game(renderer);
        }

        if self.state.is_running() {
            scheduler.request_frame();
        }
    }

    fn spawn_interval_ms(&self) -> Option<u64> {
        Some(self.config.spawn_interval_ms)
    }

    fn spawn_tick(&mut self) {
        if !self.state.is_running() {
            return;
        }
        let max_x = self.canvas_width - self.config.obstacle_width;
        let x = if max_x > 0.0 {
            self.rng.gen_range(0.0..max_x)
        } else {
            0.0
        };
        self.obstacles.push(Obstacle::new(
            x,
            -self.config.obstacle_height,
            self.config.obstacle_width,
            self.config.obstacle_height,
            self.config.obstacle_speed,
        ));
        debug!("spawned obstacle at x={:.1} ({} active)", x, self.obstacles.len());
    }

    fn handle_resize(&mut self, width: f64, height: f64) {
        if !(width >= 1.0 && height >= 1.0) {
            warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        debug!("canvas resized to {}x{}", width, height);
        self.canvas_width = width;
        self.canvas_height = height;
    }

    fn redraw(&self, renderer: &mut dyn Renderer) {
        renderer.clear();
        if self.state == GameState::NotStarted {
            renderer.draw_welcome();
            return;
        }
        renderer.draw_background(self.background_offset);
        renderer.draw_sprite(self.player_sprite(), self.player.bounds());
        for obstacle in &self.obstacles {
            renderer.draw_sprite(Sprite::Obstacle, obstacle.bounds());
        }
    }
}
