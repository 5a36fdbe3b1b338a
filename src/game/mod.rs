mod feedback;
mod score;
mod session;
mod training;

pub use feedback::{FEEDBACK_DISPLAY_MS, Feedback};
pub use score::{
    BASE_POINTS, COMBO_BONUS, HitOutcome, INITIAL_TIME_LIMIT_MS, LEVEL_SCORE_STEP,
    MIN_TIME_LIMIT_MS, MISS_PENALTY, ScoreManager, TIME_LIMIT_STEP_MS,
};
pub use session::{GameSession, SessionOptions, SessionSnapshot};
pub use training::TrainingSession;
