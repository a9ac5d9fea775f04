/// Screens in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Guidelines,
    Quiz,
}

impl Screen {
    /// Path of the screen, for logging
    pub fn path(self) -> &'static str {
        match self {
            Screen::Welcome => "/",
            Screen::Guidelines => "/guidelines",
            Screen::Quiz => "/quiz",
        }
    }
}

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    /// Enable debug overlay
    pub debug: bool,
    /// Backdrop animation paused
    pub paused: bool,
    /// Set when the user asked to quit
    pub quit: bool,
}

impl AppState {
    pub fn new(debug: bool) -> Self {
        AppState {
            screen: Screen::Welcome,
            debug,
            paused: false,
            quit: false,
        }
    }
}
