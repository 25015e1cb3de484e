/// Game-level meaning of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Start,
    PauseToggle,
    Flap,
}

impl Action {
    /// Maps a `KeyboardEvent.key` style name to an action. Unknown keys map
    /// to `None` and are ignored by the engines.
    pub fn from_key(key: &str) -> Option<Action> {
        match key {
            "ArrowRight" | "Right" | "d" | "D" => Some(Action::Right),
            "ArrowLeft" | "Left" | "a" | "A" => Some(Action::Left),
            "Enter" => Some(Action::Start),
            "Escape" | "Esc" => Some(Action::PauseToggle),
            " " | "Spacebar" | "ArrowUp" | "Up" | "w" | "W" => Some(Action::Flap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    StartButton,
    PauseButton,
    GameOverOverlay,
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Pressed(Action),
    Released(Action),
    Click(ClickTarget),
    FocusLost,
    Quit,
}

/// Requests the engine hands back to its host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Throw the session away and build a fresh one.
    Reload,
    Quit,
}

/// Held state of the two horizontal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn press(&mut self, action: Action) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    fn set(&mut self, action: Action, held: bool) {
        match action {
            Action::Left => self.left = held,
            Action::Right => self.right = held,
            _ => {}
        }
    }

    /// -1, 0 or +1. Both directions held cancel out.
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (true, false) => -1,
            (false, true) => 1,
            _ => 0,
        }
    }
}
