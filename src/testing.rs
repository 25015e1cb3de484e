//! Recording doubles for engine tests.

use crate::audio::AudioPlayer;
use crate::entity::Rect;
use crate::renderer::{Renderer, Sprite};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Background(f64),
    Welcome,
    Sprite(Sprite, Rect),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn sprites(&self, wanted: Sprite) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Sprite(sprite, rect) if *sprite == wanted => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn draw_background(&mut self, offset: f64) {
        self.calls.push(DrawCall::Background(offset));
    }

    fn draw_welcome(&mut self) {
        self.calls.push(DrawCall::Welcome);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.calls.push(DrawCall::Sprite(sprite, rect));
    }
}

/// Shares its log with the test so it can be inspected after the engine
/// takes ownership of the player.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub log: Rc<RefCell<Vec<&'static str>>>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self) {
        self.log.borrow_mut().push("play");
    }

    fn pause(&mut self) {
        self.log.borrow_mut().push("pause");
    }
}
