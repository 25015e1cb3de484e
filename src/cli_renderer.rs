use crate::entity::Rect;
use crate::input::{Action, ClickTarget, Input};
use crate::renderer::{Renderer, Sprite};
use crate::state::Overlays;
use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Canvas pixels covered by one terminal cell. Cells are roughly twice as tall
/// as they are wide.
pub const CELL_WIDTH: f64 = 10.0;
pub const CELL_HEIGHT: f64 = 20.0;

/// Lines below the play area for status text.
pub const INFO_LINES: u16 = 3;

/// Without key-release reporting a held direction is released this long after
/// its last press or auto-repeat.
const HOLD_WITHOUT_RELEASE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Empty,
    Backdrop,
    Sprite(Sprite),
}

/// What the terminal reported, in game terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliEvent {
    Input(Input),
    Resize(u16, u16),
}

pub struct CliRenderer {
    cols: u16,
    rows: u16,
    cells: Vec<Glyph>,
    title: &'static str,
    welcome: bool,
    active: bool,
    release_events: bool,
    held: HashMap<Action, Instant>,
}

impl CliRenderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Glyph::Empty; cols as usize * rows as usize],
            title: "F R O G   D O D G E",
            welcome: false,
            active: false,
            release_events: false,
            held: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: &'static str) -> Self {
        self.title = title;
        self
    }

    /// Play area for a terminal of the given size.
    pub fn play_area(term_cols: u16, term_rows: u16) -> (u16, u16) {
        (term_cols.max(20), term_rows.saturating_sub(INFO_LINES).max(10))
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.cols as f64 * CELL_WIDTH, self.rows as f64 * CELL_HEIGHT)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Glyph::Empty; cols as usize * rows as usize];
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            EnableFocusChange
        )?;
        self.active = true;

        self.release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        log::debug!("terminal key release reporting: {}", self.release_events);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut stdout = io::stdout();
        if self.release_events {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
            self.release_events = false;
        }
        execute!(
            stdout,
            DisableFocusChange,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn fill(&mut self, rect: Rect, glyph: Glyph) {
        let col_start = (rect.x / CELL_WIDTH).floor().max(0.0) as usize;
        let col_end = ((rect.x + rect.width) / CELL_WIDTH).ceil().max(0.0) as usize;
        let row_start = (rect.y / CELL_HEIGHT).floor().max(0.0) as usize;
        let row_end = ((rect.y + rect.height) / CELL_HEIGHT).ceil().max(0.0) as usize;

        let cols = self.cols as usize;
        let rows = self.rows as usize;
        for row in row_start..row_end.min(rows) {
            for col in col_start..col_end.min(cols) {
                self.cells[row * cols + col] = glyph;
            }
        }
    }

    fn queue_glyph(glyph: Glyph, stdout: &mut io::Stdout) -> io::Result<()> {
        let (bg, fg, ch) = match glyph {
            Glyph::Empty => (Color::Black, Color::Black, ' '),
            Glyph::Backdrop => (Color::Black, Color::DarkGrey, '.'),
            Glyph::Sprite(Sprite::Player) => (Color::Green, Color::Black, '@'),
            Glyph::Sprite(Sprite::DeadPlayer) => (Color::DarkRed, Color::White, 'x'),
            Glyph::Sprite(Sprite::Obstacle) => (Color::Magenta, Color::Black, 'S'),
            Glyph::Sprite(Sprite::Bird) => (Color::Yellow, Color::Black, '>'),
            Glyph::Sprite(Sprite::DeadBird) => (Color::DarkRed, Color::White, 'x'),
            Glyph::Sprite(Sprite::Pipe) => (Color::DarkGreen, Color::Green, '#'),
        };
        queue!(stdout, SetBackgroundColor(bg), SetForegroundColor(fg), Print(ch))
    }

    fn queue_centered(
        &self,
        row: u16,
        text: &str,
        color: Color,
        stdout: &mut io::Stdout,
    ) -> io::Result<()> {
        let col = self.cols.saturating_sub(text.len() as u16) / 2;
        queue!(
            stdout,
            cursor::MoveTo(col, row),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )
    }

    /// Flush the cell buffer plus the status lines for the current overlays.
    pub fn present(&mut self, overlays: Overlays, status: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        let cols = self.cols as usize;
        for row in 0..self.rows as usize {
            for glyph in &self.cells[row * cols..(row + 1) * cols] {
                Self::queue_glyph(*glyph, &mut stdout)?;
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        let middle = self.rows / 2;
        if self.welcome {
            self.queue_centered(middle.saturating_sub(1), self.title, Color::Green, &mut stdout)?;
            self.queue_centered(middle + 1, "Press ENTER to start", Color::White, &mut stdout)?;
        }
        if overlays.pause_screen {
            self.queue_centered(middle, " Paused ", Color::Yellow, &mut stdout)?;
        }
        if overlays.game_over_screen {
            self.queue_centered(middle, " Game Over! Press R to restart ", Color::Red, &mut stdout)?;
        }

        queue!(
            stdout,
            cursor::MoveTo(0, self.rows + 1),
            terminal::Clear(ClearType::CurrentLine),
            Print(status),
            cursor::MoveTo(0, self.rows + 2),
            terminal::Clear(ClearType::CurrentLine),
            Print("Arrows/A/D move | Space/W flap | Enter start | Esc pause | Q quit")
        )?;

        stdout.flush()
    }

    /// Wait up to `timeout` for the next terminal event.
    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<CliEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let event = match event::read()? {
            Event::Key(key) => self.translate_key(key).map(CliEvent::Input),
            Event::FocusLost => Some(CliEvent::Input(Input::FocusLost)),
            Event::Resize(cols, rows) => Some(CliEvent::Resize(cols, rows)),
            _ => None,
        };
        Ok(event)
    }

    fn translate_key(&mut self, key: KeyEvent) -> Option<Input> {
        let KeyEvent {
            code,
            modifiers,
            kind,
            ..
        } = key;

        if kind == KeyEventKind::Press {
            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(Input::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Input::Quit),
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    return Some(Input::Click(ClickTarget::GameOverOverlay))
                }
                _ => {}
            }
        }

        let action = action_for(code)?;
        let direction = matches!(action, Action::Left | Action::Right);

        match kind {
            KeyEventKind::Press => {
                if direction && !self.release_events {
                    self.held.insert(action, Instant::now());
                }
                Some(Input::Pressed(action))
            }
            KeyEventKind::Repeat => {
                if direction && !self.release_events {
                    self.held.insert(action, Instant::now());
                }
                None
            }
            KeyEventKind::Release => Some(Input::Released(action)),
        }
    }

    /// Synthesized key-ups for terminals that never report releases.
    pub fn expire_held(&mut self) -> Vec<Input> {
        if self.release_events {
            return Vec::new();
        }
        let mut released = Vec::new();
        self.held.retain(|action, pressed_at| {
            let expired = pressed_at.elapsed() >= HOLD_WITHOUT_RELEASE;
            if expired {
                released.push(Input::Released(*action));
            }
            !expired
        });
        released
    }
}

fn action_for(code: KeyCode) -> Option<Action> {
    let mut buf = [0u8; 4];
    let name: &str = match code {
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Char(c) => c.encode_utf8(&mut buf),
        _ => return None,
    };
    Action::from_key(name)
}

impl Renderer for CliRenderer {
    fn clear(&mut self) {
        self.cells.fill(Glyph::Empty);
        self.welcome = false;
    }

    fn draw_background(&mut self, offset: f64) {
        let shift = (offset / CELL_HEIGHT) as usize;
        let cols = self.cols as usize;
        for row in 0..self.rows as usize {
            for col in 0..cols {
                if (row + shift) % 3 == 0 && (col + row / 3) % 4 == 0 {
                    self.cells[row * cols + col] = Glyph::Backdrop;
                }
            }
        }
    }

    fn draw_welcome(&mut self) {
        self.welcome = true;
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        self.fill(rect, Glyph::Sprite(sprite));
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_keys_use_the_shared_table() {
        assert_eq!(action_for(KeyCode::Left), Some(Action::Left));
        assert_eq!(action_for(KeyCode::Char('d')), Some(Action::Right));
        assert_eq!(action_for(KeyCode::Char(' ')), Some(Action::Flap));
        assert_eq!(action_for(KeyCode::Esc), Some(Action::PauseToggle));
        assert_eq!(action_for(KeyCode::Char('z')), None);
        assert_eq!(action_for(KeyCode::Tab), None);
    }

    #[test]
    fn test_sprite_fills_covered_cells() {
        let mut renderer = CliRenderer::new(10, 5);
        renderer.draw_sprite(Sprite::Player, Rect::new(15.0, 10.0, 20.0, 20.0));

        // x 15..35 covers columns 1..=3, y 10..30 covers rows 0..=1
        assert_eq!(renderer.cells[1], Glyph::Sprite(Sprite::Player));
        assert_eq!(renderer.cells[3], Glyph::Sprite(Sprite::Player));
        assert_eq!(renderer.cells[10 + 3], Glyph::Sprite(Sprite::Player));
        assert_eq!(renderer.cells[4], Glyph::Empty);
        assert_eq!(renderer.cells[20 + 1], Glyph::Empty);
    }

    #[test]
    fn test_partly_offscreen_sprite_is_clipped() {
        let mut renderer = CliRenderer::new(4, 4);
        renderer.draw_sprite(Sprite::Obstacle, Rect::new(-20.0, -30.0, 40.0, 50.0));
        assert_eq!(renderer.cells[0], Glyph::Sprite(Sprite::Obstacle));
        assert_eq!(renderer.cells[2], Glyph::Empty);

        renderer.draw_sprite(Sprite::Obstacle, Rect::new(35.0, 75.0, 50.0, 50.0));
        assert_eq!(renderer.cells[15], Glyph::Sprite(Sprite::Obstacle));
    }

    #[test]
    fn test_clear_resets_cells() {
        let mut renderer = CliRenderer::new(4, 4);
        renderer.draw_welcome();
        renderer.draw_sprite(Sprite::Bird, Rect::new(0.0, 0.0, 40.0, 80.0));
        renderer.clear();
        assert!(renderer.cells.iter().all(|glyph| *glyph == Glyph::Empty));
        assert!(!renderer.welcome);
    }

    #[test]
    fn test_held_direction_expires_without_release_reporting() {
        let mut renderer = CliRenderer::new(4, 4);
        renderer
            .held
            .insert(Action::Left, Instant::now() - HOLD_WITHOUT_RELEASE);
        renderer.held.insert(Action::Right, Instant::now());

        assert_eq!(renderer.expire_held(), vec![Input::Released(Action::Left)]);
        assert!(renderer.held.contains_key(&Action::Right));
    }
}
