//! Input adapter: discrete browser events to per-tick control intents

/// A control request produced by a key press, tap or button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Jump,
    MoveLeft,
    MoveRight,
}

/// Map a `KeyboardEvent.key` value to an intent
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        " " | "ArrowUp" | "w" | "W" => Some(Intent::Jump),
        "ArrowLeft" | "a" | "A" => Some(Intent::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Intent::MoveRight),
        _ => None,
    }
}

/// Input commands for a single tick
///
/// Each flag is a one-shot request. The driver takes the whole latch at the
/// start of a tick, so a request is consumed by exactly the tick that reads
/// it and a held key never turns into several moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub jump: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl TickInput {
    /// Latch an intent until the next tick
    pub fn press(&mut self, intent: Intent) {
        match intent {
            Intent::Jump => self.jump = true,
            Intent::MoveLeft => self.move_left = true,
            Intent::MoveRight => self.move_right = true,
        }
    }

    /// Hand the latched requests to a tick and clear them
    pub fn take(&mut self) -> TickInput {
        std::mem::take(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == TickInput::default()
    }
}
