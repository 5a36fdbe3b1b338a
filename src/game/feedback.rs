use crate::model::note::NoteName;

/// How long a feedback message stays visible.
pub const FEEDBACK_DISPLAY_MS: u64 = 1_000;

/// Message shown after an answer or a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    LevelUp { level: u32 },
    Wrong { expected: NoteName },
    TimeUp { expected: NoteName },
}

impl Feedback {
    /// Whether this message reports a success (green/yellow) or a miss (red).
    pub fn is_positive(&self) -> bool {
        matches!(self, Feedback::Correct | Feedback::LevelUp { .. })
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Correct!"),
            Feedback::LevelUp { level } => write!(f, "Level {level}!"),
            Feedback::Wrong { expected } => write!(f, "No! It was {expected}"),
            Feedback::TimeUp { expected } => write!(f, "Time's up! It was {expected}"),
        }
    }
}
