/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Separating-axis overlap test. Touching edges do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Anything with a bounding box that can take part in a collision.
pub trait Collider {
    fn bounds(&self) -> Rect;
}

impl Collider for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

pub fn collide(a: &dyn Collider, b: &dyn Collider) -> bool {
    a.bounds().overlaps(&b.bounds())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub dx: f64,
    pub speed: f64,
    pub dead: bool,
}

impl Player {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            dx: 0.0,
            speed,
            dead: false,
        }
    }

    pub fn move_left(&mut self) {
        self.dx = -self.speed;
    }

    pub fn move_right(&mut self) {
        self.dx = self.speed;
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
    }

    /// Apply velocity, then keep the sprite fully inside `[0, canvas_width]`.
    pub fn advance(&mut self, canvas_width: f64) {
        self.x += self.dx;
        self.clamp(canvas_width);
    }

    pub fn clamp(&mut self, canvas_width: f64) {
        let max_x = (canvas_width - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

impl Collider for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
}

impl Obstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, speed: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            speed,
        }
    }

    pub fn fall(&mut self) {
        self.y += self.speed;
    }

    pub fn is_below(&self, canvas_height: f64) -> bool {
        self.y >= canvas_height
    }
}

impl Collider for Obstacle {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub velocity: f64,
    pub gravity: f64,
    pub lift: f64,
    pub dead: bool,
}

impl Bird {
    pub fn flap(&mut self) {
        self.velocity = self.lift;
    }

    /// One gravity step; the bird rests on the floor and ceiling instead of
    /// leaving the canvas.
    pub fn advance(&mut self, canvas_height: f64) {
        self.velocity += self.gravity;
        self.y += self.velocity;

        if self.y + self.height > canvas_height {
            self.y = canvas_height - self.height;
            self.velocity = 0.0;
        }
        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
        }
    }
}

impl Collider for Bird {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A pipe pair: a segment hanging from the top and one standing on the floor,
/// with an open gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub width: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Pipe {
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.top)
    }

    pub fn bottom_rect(&self, canvas_height: f64) -> Rect {
        Rect::new(self.x, canvas_height - self.bottom, self.width, self.bottom)
    }

    pub fn is_offscreen(&self) -> bool {
        self.x + self.width <= 0.0
    }
}
