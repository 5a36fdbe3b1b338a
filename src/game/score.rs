/// Time allowed for the first rounds, in milliseconds.
pub const INITIAL_TIME_LIMIT_MS: u32 = 10_000;
/// Time removed from the limit at each level-up.
pub const TIME_LIMIT_STEP_MS: u32 = 500;
/// The limit never drops below this.
pub const MIN_TIME_LIMIT_MS: u32 = 2_000;
/// Points between two level boundaries.
pub const LEVEL_SCORE_STEP: u32 = 50;
/// Points removed for a wrong answer or a timeout.
pub const MISS_PENALTY: u32 = 5;
/// Points per correct answer, multiplied by the level.
pub const BASE_POINTS: u32 = 10;
/// Extra points per combo step beyond the first.
pub const COMBO_BONUS: u32 = 2;

/// What a correct answer earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub points: u32,
    /// Levels gained by this answer (one per 50-point boundary crossed).
    pub levels_gained: u32,
}

/// Score, level, combo and round time limit.
///
/// Each correct answer grants one level per multiple of 50 its points carry
/// the score past, including a boundary climbed again after a penalty.
/// Losing points never takes a level away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreManager {
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub time_limit_ms: u32,
}

impl Default for ScoreManager {
    fn default() -> Self {
        Self {
            score: 0,
            level: 1,
            combo: 0,
            best_combo: 0,
            time_limit_ms: INITIAL_TIME_LIMIT_MS,
        }
    }
}

impl ScoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points a correct answer is worth at `level` once the combo is `combo`.
    pub fn points_for(level: u32, combo: u32) -> u32 {
        BASE_POINTS
            .saturating_mul(level)
            .saturating_add(combo.saturating_sub(1).saturating_mul(COMBO_BONUS))
    }

    /// Correct answer: extend the combo, add points, level up on each
    /// boundary crossed by this answer.
    pub fn register_hit(&mut self) -> HitOutcome {
        self.combo = self.combo.saturating_add(1);
        self.best_combo = self.best_combo.max(self.combo);

        let points = Self::points_for(self.level, self.combo);
        let previous = self.score;
        self.score = self.score.saturating_add(points);

        let levels_gained =
            (floor_boundary(self.score) - floor_boundary(previous)) / LEVEL_SCORE_STEP;
        self.level_up(levels_gained);

        HitOutcome {
            points,
            levels_gained,
        }
    }

    /// Wrong answer or timeout: break the combo, take the penalty (floor 0).
    pub fn register_miss(&mut self) {
        self.combo = 0;
        self.score = self.score.saturating_sub(MISS_PENALTY);
    }

    fn level_up(&mut self, levels: u32) {
        self.level = self.level.saturating_add(levels);
        self.time_limit_ms = self
            .time_limit_ms
            .saturating_sub(levels.saturating_mul(TIME_LIMIT_STEP_MS))
            .max(MIN_TIME_LIMIT_MS);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn floor_boundary(score: u32) -> u32 {
    score / LEVEL_SCORE_STEP * LEVEL_SCORE_STEP
}
