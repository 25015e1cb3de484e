pub mod audio;
pub mod config;
pub mod engine;
pub mod entity;
pub mod flappy;
pub mod game;
pub mod input;
pub mod renderer;
pub mod schedule;
pub mod state;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_main;

#[cfg(test)]
mod testing;

pub use audio::{AudioPlayer, Silence};
pub use config::{ConfigError, FlappyConfig, GameConfig};
pub use engine::Engine;
pub use entity::{collide, Bird, Collider, Obstacle, Pipe, Player, Rect};
pub use flappy::FlappyGame;
pub use game::Game;
pub use input::{Action, ClickTarget, HostCommand, Input, InputState};
pub use renderer::{Renderer, Sprite};
pub use schedule::{FrameRequest, FrameScheduler, SpawnTimer};
pub use state::{GameState, Overlays};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;

#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
