use crate::entity::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Player,
    DeadPlayer,
    Obstacle,
    Bird,
    DeadBird,
    Pipe,
}

/// Drawing surface the engines paint onto each frame.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Wipe the whole surface
    fn clear(&mut self);

    /// Paint the scrolling backdrop; `offset` is the vertical scroll in pixels
    fn draw_background(&mut self, offset: f64);

    /// Paint the title screen shown before the first start
    fn draw_welcome(&mut self);

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect);
}
