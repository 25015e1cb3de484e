#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// What a host needs to show around the canvas for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub start_button: bool,
    pub pause_button: bool,
    pub pause_screen: bool,
    pub game_over_screen: bool,
}

impl GameState {
    pub fn is_running(self) -> bool {
        self == GameState::Running
    }

    /// NotStarted -> Running. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if *self != GameState::NotStarted {
            return false;
        }
        *self = GameState::Running;
        true
    }

    /// Running <-> Paused. NotStarted and Over are left alone.
    pub fn toggle_pause(&mut self) -> bool {
        match *self {
            GameState::Running => *self = GameState::Paused,
            GameState::Paused => *self = GameState::Running,
            GameState::NotStarted | GameState::Over => return false,
        }
        true
    }

    /// Running -> Paused only; losing focus never resumes.
    pub fn auto_pause(&mut self) -> bool {
        if *self != GameState::Running {
            return false;
        }
        *self = GameState::Paused;
        true
    }

    /// Running -> Over.
    pub fn end(&mut self) -> bool {
        if *self != GameState::Running {
            return false;
        }
        *self = GameState::Over;
        true
    }

    pub fn overlays(self) -> Overlays {
        match self {
            GameState::NotStarted => Overlays {
                start_button: true,
                ..Overlays::default()
            },
            GameState::Running => Overlays {
                pause_button: true,
                ..Overlays::default()
            },
            GameState::Paused => Overlays {
                pause_button: true,
                pause_screen: true,
                ..Overlays::default()
            },
            GameState::Over => Overlays {
                game_over_screen: true,
                ..Overlays::default()
            },
        }
    }
}
