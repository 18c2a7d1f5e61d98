//! Device input mapping

use crate::sim::{GamePhase, Intent};

/// What a raw input asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    /// Start or restart a run
    Start,
    ToggleMute,
    ToggleAutopilot,
}

/// Map a `KeyboardEvent.key` value
pub fn key_command(key: &str) -> Option<Command> {
    let command = match key {
        "ArrowLeft" | "a" | "A" => Command::Intent(Intent::MoveLeft),
        "ArrowRight" | "d" | "D" => Command::Intent(Intent::MoveRight),
        "ArrowUp" | "w" | "W" | "Shift" | "n" | "N" => Command::Intent(Intent::Boost),
        "Escape" | "p" | "P" => Command::Intent(Intent::PauseToggle),
        "Enter" => Command::Start,
        "m" | "M" => Command::ToggleMute,
        "i" | "I" => Command::ToggleAutopilot,
        _ => return None,
    };
    Some(command)
}

/// Map an on-screen button id
pub fn button_command(id: &str) -> Option<Command> {
    let command = match id {
        "btn-left" => Command::Intent(Intent::MoveLeft),
        "btn-right" => Command::Intent(Intent::MoveRight),
        "btn-nitro" => Command::Intent(Intent::Boost),
        "pause-btn" => Command::Intent(Intent::PauseToggle),
        "start-btn" | "restart-btn" => Command::Start,
        "mute-btn" => Command::ToggleMute,
        _ => return None,
    };
    Some(command)
}

/// Caption for the pause button in `phase`
pub fn pause_label(phase: GamePhase) -> &'static str {
    if phase == GamePhase::Paused { "Resume" } else { "Pause" }
}

/// Classifies a touch as a horizontal swipe or a tap
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    start_x: Option<f32>,
    threshold: f32,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self {
            start_x: None,
            threshold,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.start_x = Some(x);
    }

    /// Finish the touch. `None` for a tap or a touch that never started.
    pub fn touch_end(&mut self, x: f32) -> Option<Intent> {
        let dx = x - self.start_x.take()?;
        if dx.abs() <= self.threshold {
            None
        } else if dx > 0.0 {
            Some(Intent::MoveRight)
        } else {
            Some(Intent::MoveLeft)
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}
