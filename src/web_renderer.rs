use crate::entity::Rect;
use crate::renderer::{Renderer, Sprite};
use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

const BAND_HEIGHT: f64 = 40.0;

// Fallback colors while images are missing
const COLOR_BACKGROUND: &str = "#000000";
const COLOR_BAND: &str = "#0B2A12";
const COLOR_PLAYER: &str = "#55FF55";
const COLOR_DEAD_PLAYER: &str = "#777777";
const COLOR_OBSTACLE: &str = "#FF5555";
const COLOR_BIRD: &str = "yellow";
const COLOR_DEAD_BIRD: &str = "#777777";
const COLOR_PIPE: &str = "green";
const COLOR_UI: &str = "#FFFFFF";

fn fallback_color(sprite: Sprite) -> &'static str {
    match sprite {
        Sprite::Player => COLOR_PLAYER,
        Sprite::DeadPlayer => COLOR_DEAD_PLAYER,
        Sprite::Obstacle => COLOR_OBSTACLE,
        Sprite::Bird => COLOR_BIRD,
        Sprite::DeadBird => COLOR_DEAD_BIRD,
        Sprite::Pipe => COLOR_PIPE,
    }
}

/// True once an image has finished loading with real pixels.
fn is_ready(image: &HtmlImageElement) -> bool {
    image.complete() && image.natural_width() > 0
}

fn load_image(url: &str) -> Result<HtmlImageElement, JsValue> {
    let image = HtmlImageElement::new()?;

    let failed_url = url.to_string();
    let on_error = Closure::wrap(Box::new(move || {
        log::warn!("failed to load image {}", failed_url);
    }) as Box<dyn FnMut()>);
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    on_error.forget();

    image.set_src(url);
    Ok(image)
}

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    sprites: HashMap<Sprite, HtmlImageElement>,
    background: Option<HtmlImageElement>,
    welcome: Option<HtmlImageElement>,
    title: String,
}

impl WebRenderer {
    pub fn new(canvas_id: &str, title: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            context,
            sprites: HashMap::new(),
            background: None,
            welcome: None,
            title: title.to_string(),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn load_sprite(&mut self, sprite: Sprite, url: &str) -> Result<(), JsValue> {
        self.sprites.insert(sprite, load_image(url)?);
        Ok(())
    }

    pub fn load_background(&mut self, url: &str) -> Result<(), JsValue> {
        self.background = Some(load_image(url)?);
        Ok(())
    }

    pub fn load_welcome(&mut self, url: &str) -> Result<(), JsValue> {
        self.welcome = Some(load_image(url)?);
        Ok(())
    }

    /// Square canvas sized to the smaller window dimension.
    pub fn fit_to_window(&self) -> Result<(f64, f64), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);
        let size = width.min(height).max(1.0) as u32;
        self.canvas.set_width(size);
        self.canvas.set_height(size);
        Ok((size as f64, size as f64))
    }

    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn fill_rect(&self, rect: Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) {
        if let Err(e) = self.context.fill_text(text, x, y) {
            log::warn!("fillText failed: {:?}", e);
        }
    }

    fn draw_image(&self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) {
        if let Err(e) = self
            .context
            .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height)
        {
            log::warn!("drawImage failed: {:?}", e);
        }
    }
}

impl Renderer for WebRenderer {
    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_background(&mut self, offset: f64) {
        let (width, height) = self.size();
        match &self.background {
            Some(image) if is_ready(image) => {
                // Two stacked copies so the seam scrolls through the view
                self.draw_image(image, 0.0, offset - height, width, height);
                self.draw_image(image, 0.0, offset, width, height);
            }
            _ => {
                self.fill_rect(Rect::new(0.0, 0.0, width, height), COLOR_BACKGROUND);
                let mut y = offset % (BAND_HEIGHT * 2.0) - BAND_HEIGHT * 2.0;
                while y < height {
                    self.fill_rect(Rect::new(0.0, y, width, BAND_HEIGHT), COLOR_BAND);
                    y += BAND_HEIGHT * 2.0;
                }
            }
        }
    }

    fn draw_welcome(&mut self) {
        let (width, height) = self.size();
        self.fill_rect(Rect::new(0.0, 0.0, width, height), COLOR_BACKGROUND);

        if let Some(image) = self.welcome.as_ref().filter(|image| is_ready(image)) {
            let image_width = image.natural_width() as f64;
            let image_height = image.natural_height() as f64;
            let x = (width - image_width) / 2.0;
            let y = (height - image_height) / 2.0 - 50.0;
            self.draw_image(image, x, y, image_width, image_height);
            return;
        }

        self.context.set_fill_style_str(COLOR_UI);
        self.context.set_font("24px monospace");
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.fill_text(&self.title, width / 2.0, height / 2.0 - 20.0);
        self.context.set_font("14px monospace");
        self.fill_text("Press Enter to start", width / 2.0, height / 2.0 + 20.0);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        match self.sprites.get(&sprite) {
            Some(image) if is_ready(image) => {
                self.draw_image(image, rect.x, rect.y, rect.width, rect.height)
            }
            _ => self.fill_rect(rect, fallback_color(sprite)),
        }
    }
}
