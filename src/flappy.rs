//! Flapping-bird variant: gravity pulls the bird down, a flap kicks it up,
//! and pipe pairs scroll in from the right.

use crate::audio::{AudioPlayer, Silence};
use crate::config::{ConfigError, FlappyConfig};
use crate::engine::Engine;
use crate::entity::{Bird, Collider, Pipe};
use crate::input::{Action, ClickTarget, HostCommand, Input};
use crate::renderer::{Renderer, Sprite};
use crate::schedule::FrameScheduler;
use crate::state::GameState;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct FlappyGame {
    pub config: FlappyConfig,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub state: GameState,
    pub frame_count: u64,
    rng: StdRng,
    audio: Box<dyn AudioPlayer>,
}

impl FlappyGame {
    pub fn new(config: FlappyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bird = Bird {
            x: config.bird_x,
            y: config.bird_y.min(config.canvas_height - config.bird_size),
            width: config.bird_size,
            height: config.bird_size,
            velocity: 0.0,
            gravity: config.gravity,
            lift: config.lift,
            dead: false,
        };

        Ok(Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            bird,
            pipes: Vec::new(),
            state: GameState::NotStarted,
            frame_count: 0,
            rng: StdRng::from_entropy(),
            audio: Box::new(Silence),
            config,
        })
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPlayer>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn flap(&mut self, scheduler: &mut dyn FrameScheduler) {
        match self.state {
            GameState::NotStarted => {
                self.start(scheduler);
                self.bird.flap();
            }
            GameState::Running => self.bird.flap(),
            GameState::Paused | GameState::Over => {}
        }
    }

    fn spawn_pipe(&mut self) {
        let range = self.canvas_height - self.config.pipe_gap;
        let top = if range > 0.0 {
            self.rng.gen_range(0.0..range)
        } else {
            0.0
        };
        let bottom = self.canvas_height - top - self.config.pipe_gap;
        self.pipes.push(Pipe {
            x: self.canvas_width,
            width: self.config.pipe_width,
            top,
            bottom,
        });
        debug!("spawned pipe with gap at y={:.1}", top);
    }

    fn update_pipes(&mut self) {
        if self.frame_count % self.config.pipe_spawn_frames == 0 {
            self.spawn_pipe();
        }
        for pipe in &mut self.pipes {
            pipe.x -= self.config.pipe_speed;
        }
        self.pipes.retain(|pipe| !pipe.is_offscreen());
    }

    fn hits_pipe(&self) -> bool {
        let bird = self.bird.bounds();
        self.pipes.iter().any(|pipe| {
            bird.overlaps(&pipe.top_rect()) || bird.overlaps(&pipe.bottom_rect(self.canvas_height))
        })
    }

    fn bird_sprite(&self) -> Sprite {
        if self.bird.dead {
            Sprite::DeadBird
        } else {
            Sprite::Bird
        }
    }

    fn end_game(&mut self, renderer: &mut dyn Renderer) {
        if !self.state.end() {
            return;
        }
        info!("bird hit a pipe after {} frames", self.frame_count);
        self.audio.pause();
        self.bird.dead = true;
        self.redraw(renderer);
    }

    fn draw_pipes(&self, renderer: &mut dyn Renderer) {
        for pipe in &self.pipes {
            renderer.draw_sprite(Sprite::Pipe, pipe.top_rect());
            renderer.draw_sprite(Sprite::Pipe, pipe.bottom_rect(self.canvas_height));
        }
    }
}

impl Engine for FlappyGame {
    fn state(&self) -> GameState {
        self.state
    }

    fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if !self.state.start() {
            return;
        }
        info!("flappy game started");
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
            Input::Pressed(Action::Flap) | Input::Click(ClickTarget::Canvas) => self.flap(scheduler),
            Input::Pressed(Action::Start) | Input::Click(ClickTarget::StartButton) => {
                self.start(scheduler)
            }
            Input::Pressed(Action::PauseToggle) | Input::Click(ClickTarget::PauseButton) => {
                self.toggle_pause(scheduler)
            }
            Input::Click(ClickTarget::GameOverOverlay) if self.state == GameState::Over => {
                return Some(HostCommand::Reload);
            }
            Input::FocusLost => self.auto_pause(),
            Input::Quit => return Some(HostCommand::Quit),
            Input::Pressed(_) | Input::Released(_) | Input::Click(_) => {}
        }
        None
    }

    fn frame(&mut self, renderer: &mut dyn Renderer, scheduler: &mut dyn FrameScheduler) {
        if !self.state.is_running() {
            return;
        }

        renderer.clear();
        self.bird.advance(self.canvas_height);
        renderer.draw_sprite(self.bird_sprite(), self.bird.bounds());

        self.update_pipes();
        self.draw_pipes(renderer);
        trace!(
            "frame {}: bird y={:.1} v={:.1}, {} pipes",
            self.frame_count,
            self.bird.y,
            self.bird.velocity,
            self.pipes.len()
        );

        if self.hits_pipe() {
            self.end_game(renderer);
        }

        self.frame_count += 1;

        if self.state.is_running() {
            scheduler.request_frame();
        }
    }

    fn handle_resize(&mut self, width: f64, height: f64) {
        if !(width >= 1.0 && height >= 1.0) {
            warn!("ignoring resize to {}x{}", width, height);
            return;
        }
        self.canvas_width = width;
        self.canvas_height = height;
    }

    fn redraw(&self, renderer: &mut dyn Renderer) {
        renderer.clear();
        if self.state == GameState::NotStarted {
            renderer.draw_welcome();
        }
        renderer.draw_sprite(self.bird_sprite(), self.bird.bounds());
        self.draw_pipes(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::FrameRequest;
    use crate::testing::{RecordingAudio, RecordingRenderer};
    use proptest::prelude::*;

    fn running_game() -> (FlappyGame, FrameRequest) {
        let mut game = FlappyGame::new(FlappyConfig::default()).unwrap().with_seed(3);
        let mut frames = FrameRequest::new();
        game.start(&mut frames);
        (game, frames)
    }

    fn run_frames(game: &mut FlappyGame, frames: &mut FrameRequest, count: usize) {
        let mut renderer = RecordingRenderer::default();
        for _ in 0..count {
            game.frame(&mut renderer, frames);
        }
    }

    #[test]
    fn test_flap_starts_the_game() {
        let mut game = FlappyGame::new(FlappyConfig::default()).unwrap();
        let mut frames = FrameRequest::new();

        game.handle_input(Input::Pressed(Action::Flap), &mut frames);
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.bird.velocity, -15.0);
        assert!(frames.take());
    }

    #[test]
    fn test_gravity_accumulates() {
        let (mut game, mut frames) = running_game();
        run_frames(&mut game, &mut frames, 2);
        assert!((game.bird.velocity - 1.2).abs() < 1e-9);
        assert!((game.bird.y - 151.8).abs() < 1e-9);
    }

    #[test]
    fn test_first_frame_spawns_pipe_at_right_edge() {
        let (mut game, mut frames) = running_game();
        run_frames(&mut game, &mut frames, 1);

        assert_eq!(game.pipes.len(), 1);
        let pipe = &game.pipes[0];
        assert_eq!(pipe.x, game.canvas_width - 2.0);
        assert!((pipe.top + pipe.bottom + game.config.pipe_gap - game.canvas_height).abs() < 1e-9);
    }

    #[test]
    fn test_pipes_spawn_every_interval() {
        let (mut game, _) = running_game();
        for _ in 0..181 {
            game.update_pipes();
            game.frame_count += 1;
        }
        // Frames 0, 90 and 180
        assert_eq!(game.pipes.len(), 3);
    }

    #[test]
    fn test_offscreen_pipes_are_removed() {
        let (mut game, mut frames) = running_game();
        game.frame_count = 1;
        game.pipes.push(Pipe {
            x: -28.0,
            width: 30.0,
            top: 0.0,
            bottom: 0.0,
        });
        run_frames(&mut game, &mut frames, 1);
        assert!(game.pipes.is_empty());
    }

    #[test]
    fn test_hitting_pipe_ends_game() {
        let (mut game, mut frames) = running_game();
        frames.take();
        game.frame_count = 1;
        game.pipes.push(Pipe {
            x: 52.0,
            width: 30.0,
            top: 400.0,
            bottom: 140.0,
        });

        run_frames(&mut game, &mut frames, 1);
        assert_eq!(game.state, GameState::Over);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_hitting_pipe_kills_bird_and_redraws() {
        let audio = RecordingAudio::default();
        let mut game = FlappyGame::new(FlappyConfig::default())
            .unwrap()
            .with_seed(3)
            .with_audio(Box::new(audio.clone()));
        let mut frames = FrameRequest::new();
        game.start(&mut frames);
        game.frame_count = 1;
        game.pipes.push(Pipe {
            x: 52.0,
            width: 30.0,
            top: 400.0,
            bottom: 140.0,
        });

        let mut renderer = RecordingRenderer::default();
        game.frame(&mut renderer, &mut frames);

        assert!(game.bird.dead);
        assert_eq!(renderer.sprites(Sprite::DeadBird).len(), 1);
        assert_eq!(*audio.log.borrow(), vec!["play", "pause"]);
    }

    #[test]
    fn test_enter_and_start_button_start_once() {
        let mut game = FlappyGame::new(FlappyConfig::default()).unwrap();
        let mut frames = FrameRequest::new();

        game.handle_input(Input::Pressed(Action::Start), &mut frames);
        assert_eq!(game.state, GameState::Running);
        assert!(frames.take());

        game.handle_input(Input::Click(ClickTarget::StartButton), &mut frames);
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.bird.velocity, 0.0);
        assert!(!frames.is_pending());
    }

    #[test]
    fn test_pause_button_toggles() {
        let (mut game, mut frames) = running_game();
        frames.take();

        game.handle_input(Input::Click(ClickTarget::PauseButton), &mut frames);
        assert_eq!(game.state, GameState::Paused);
        assert!(!frames.is_pending());

        game.handle_input(Input::Click(ClickTarget::PauseButton), &mut frames);
        assert_eq!(game.state, GameState::Running);
        assert!(frames.take());
    }

    #[test]
    fn test_bird_in_gap_survives() {
        let (mut game, mut frames) = running_game();
        game.frame_count = 1;
        game.pipes.push(Pipe {
            x: 52.0,
            width: 30.0,
            top: 100.0,
            bottom: 440.0,
        });

        run_frames(&mut game, &mut frames, 1);
        assert_eq!(game.state, GameState::Running);
    }

    #[test]
    fn test_flap_while_paused_is_ignored() {
        let (mut game, mut frames) = running_game();
        game.toggle_pause(&mut frames);
        game.handle_input(Input::Pressed(Action::Flap), &mut frames);
        assert_eq!(game.bird.velocity, 0.0);
        assert_eq!(game.state, GameState::Paused);
    }

    proptest! {
        /// The bird never leaves the canvas vertically
        #[test]
        fn prop_bird_stays_on_canvas(flaps in prop::collection::vec(any::<bool>(), 1..300)) {
            let (mut game, mut frames) = running_game();
            let mut renderer = RecordingRenderer::default();

            for flap in flaps {
                // Pipes are irrelevant to this property
                game.pipes.clear();
                if flap {
                    game.handle_input(Input::Pressed(Action::Flap), &mut frames);
                }
                game.frame(&mut renderer, &mut frames);
                prop_assert!(game.bird.y >= 0.0);
                prop_assert!(game.bird.y + game.bird.height <= game.canvas_height);
            }
        }
    }
}
