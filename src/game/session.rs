use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::feedback::{FEEDBACK_DISPLAY_MS, Feedback};
use super::score::ScoreManager;
use crate::audio::{ToneCache, ToneKey};
use crate::model::note::{Clef, ClefMode, NOTE_COUNT, Note, NoteName};
use crate::stats::{StatisticsRecord, StatisticsStore};
use crate::traits::audio::AudioSink;
use crate::traits::time::TimeProvider;

/// Start-up choices for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub clef_mode: ClefMode,
    pub sound_enabled: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            clef_mode: ClefMode::Mixed,
            sound_enabled: true,
        }
    }
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub note: Note,
    pub score: u32,
    pub level: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub high_score: u32,
    pub time_remaining_ms: u64,
    pub time_limit_ms: u32,
    pub sound_enabled: bool,
    /// Last message, while it is still on screen.
    pub feedback: Option<Feedback>,
}

impl SessionSnapshot {
    /// Remaining share of the round time, 1.0 at round start.
    pub fn time_fraction(&self) -> f64 {
        if self.time_limit_ms == 0 {
            return 0.0;
        }
        (self.time_remaining_ms as f64 / self.time_limit_ms as f64).clamp(0.0, 1.0)
    }
}

/// One game: rounds of "name the note on the staff" against a timer.
///
/// Every answer or timeout immediately starts the next round; the session
/// only ends when its owner stops calling it (see [`GameSession::finish`]).
pub struct GameSession<'a, A: AudioSink, T: TimeProvider> {
    tones: &'a ToneCache,
    audio: A,
    clock: T,
    rng: StdRng,
    store: StatisticsStore,
    stats: StatisticsRecord,
    score: ScoreManager,
    clef_mode: ClefMode,
    sound_enabled: bool,
    current_note: Note,
    round_started_ms: u64,
    round_limit_ms: u32,
    feedback: Option<(Feedback, u64)>,
}

impl<'a, A: AudioSink, T: TimeProvider> GameSession<'a, A, T> {
    /// Load statistics, count the session and start the first round.
    pub fn new(
        tones: &'a ToneCache,
        audio: A,
        clock: T,
        store: StatisticsStore,
        options: SessionOptions,
    ) -> Self {
        Self::with_rng(tones, audio, clock, store, options, StdRng::from_entropy())
    }

    /// Same as [`GameSession::new`] with a caller-provided random source.
    pub fn with_rng(
        tones: &'a ToneCache,
        audio: A,
        clock: T,
        store: StatisticsStore,
        options: SessionOptions,
        rng: StdRng,
    ) -> Self {
        let mut stats = store.load();
        stats.sessions_played = stats.sessions_played.saturating_add(1);
        info!(
            "session {} started ({:?}, high score {})",
            stats.sessions_played, options.clef_mode, stats.high_score
        );

        let now = clock.now_ms();
        let mut session = Self {
            tones,
            audio,
            clock,
            rng,
            store,
            stats,
            score: ScoreManager::new(),
            clef_mode: options.clef_mode,
            sound_enabled: options.sound_enabled,
            current_note: Note::new(NoteName::Do, Clef::Treble),
            round_started_ms: now,
            round_limit_ms: 0,
            feedback: None,
        };
        session.start_round();
        session
    }

    /// Draw a new note, restart the timer and play the tone.
    pub fn start_round(&mut self) {
        let now = self.clock.now_ms();
        self.draw_note(now);
        if self.sound_enabled {
            self.play_current();
        }
    }

    fn draw_note(&mut self, started_ms: u64) {
        let clef = match self.clef_mode.fixed_clef() {
            Some(clef) => clef,
            None => Clef::all()[self.rng.gen_range(0..Clef::all().len())],
        };
        let name = NoteName::all()[self.rng.gen_range(0..NOTE_COUNT)];
        self.current_note = Note::new(name, clef);
        self.round_started_ms = started_ms;
        self.round_limit_ms = self.score.time_limit_ms;
        debug!("round: {name} on {clef:?} clef, {} ms", self.round_limit_ms);
    }

    fn play_current(&mut self) {
        let key = ToneKey::new(self.current_note.clef, self.current_note.name);
        let Some(tone) = self.tones.get(key) else {
            warn!("no tone rendered for {key:?}");
            return;
        };
        if let Err(e) = self.audio.play(key, tone) {
            warn!("Failed to play {key:?}: {e}");
        }
    }

    /// Judge an answer (0 = Do .. 6 = Si) and move on to the next round.
    /// Indices past Si count as wrong.
    pub fn submit_answer(&mut self, index: usize) -> Feedback {
        let expected = self.current_note.name;
        let feedback = if NoteName::from_index(index) == Some(expected) {
            self.on_correct(expected)
        } else {
            self.on_miss(expected);
            Feedback::Wrong { expected }
        };
        self.set_feedback(feedback);
        self.start_round();
        feedback
    }

    /// Round ran out of time: scored like a wrong answer.
    pub fn on_timeout(&mut self) -> Feedback {
        let expected = self.current_note.name;
        self.on_miss(expected);
        let feedback = Feedback::TimeUp { expected };
        self.set_feedback(feedback);
        self.start_round();
        feedback
    }

    fn on_correct(&mut self, name: NoteName) -> Feedback {
        let outcome = self.score.register_hit();
        self.stats.record_success(name);

        if self.score.score > self.stats.high_score {
            self.stats.high_score = self.score.score;
            info!("new high score: {}", self.stats.high_score);
            self.store.save(&self.stats);
        }

        if outcome.levels_gained > 0 {
            info!(
                "level {} reached, {} ms per note",
                self.score.level, self.score.time_limit_ms
            );
            Feedback::LevelUp {
                level: self.score.level,
            }
        } else {
            Feedback::Correct
        }
    }

    fn on_miss(&mut self, name: NoteName) {
        self.score.register_miss();
        self.stats.record_miss(name);
    }

    fn set_feedback(&mut self, feedback: Feedback) {
        self.feedback = Some((feedback, self.clock.now_ms()));
    }

    /// Whether the current round has run past its limit.
    pub fn is_timed_out(&self) -> bool {
        self.clock.now_ms().saturating_sub(self.round_started_ms) > u64::from(self.round_limit_ms)
    }

    /// Poll from the main loop. Settles every round that expired since the
    /// last call, each one starting at the previous deadline, and returns the
    /// feedback of the last. Only the round left running plays its tone.
    pub fn update(&mut self) -> Option<Feedback> {
        let mut last = None;
        while self.is_timed_out() {
            let deadline = self.round_started_ms + u64::from(self.round_limit_ms);
            let expected = self.current_note.name;
            self.on_miss(expected);
            let feedback = Feedback::TimeUp { expected };
            self.set_feedback(feedback);
            self.draw_note(deadline);
            last = Some(feedback);
        }
        if last.is_some() && self.sound_enabled {
            self.play_current();
        }
        last
    }

    /// Flip sound on or off. Returns the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Milliseconds left in the current round, zero once expired.
    pub fn time_remaining_ms(&self) -> u64 {
        let deadline = self.round_started_ms + u64::from(self.round_limit_ms);
        deadline.saturating_sub(self.clock.now_ms())
    }

    /// Last feedback while it is still meant to be displayed.
    pub fn visible_feedback(&self) -> Option<Feedback> {
        let (feedback, at) = self.feedback?;
        (self.clock.now_ms().saturating_sub(at) < FEEDBACK_DISPLAY_MS).then_some(feedback)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            note: self.current_note,
            score: self.score.score,
            level: self.score.level,
            combo: self.score.combo,
            best_combo: self.score.best_combo,
            high_score: self.stats.high_score,
            time_remaining_ms: self.time_remaining_ms(),
            time_limit_ms: self.round_limit_ms,
            sound_enabled: self.sound_enabled,
            feedback: self.visible_feedback(),
        }
    }

    /// Replace the note of the current round, keeping its timer running.
    /// Used by scripted drills that need a known note sequence.
    pub fn set_current_note(&mut self, note: Note) {
        self.current_note = note;
    }

    /// Persist the statistics now. Returns whether the write succeeded.
    pub fn save_statistics(&self) -> bool {
        self.store.save(&self.stats)
    }

    /// End the session: persist and hand back the final statistics.
    pub fn finish(self) -> StatisticsRecord {
        info!(
            "session ended: score {}, best combo {}",
            self.score.score, self.score.best_combo
        );
        self.store.save(&self.stats);
        self.stats
    }

    pub fn current_note(&self) -> Note {
        self.current_note
    }

    pub fn score(&self) -> &ScoreManager {
        &self.score
    }

    pub fn stats(&self) -> &StatisticsRecord {
        &self.stats
    }

    pub fn high_score(&self) -> u32 {
        self.stats.high_score
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn clef_mode(&self) -> ClefMode {
        self.clef_mode
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::NoteStats;
    use crate::traits::audio::MockAudio;
    use crate::traits::time::MockTimeProvider;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        tones: ToneCache,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
                tones: ToneCache::with_duration(0.01),
            }
        }

        fn store(&self) -> StatisticsStore {
            StatisticsStore::new(self.dir.path().join("stats.json"))
        }

        fn session(&self, mode: ClefMode) -> GameSession<'_, MockAudio, MockTimeProvider> {
            GameSession::with_rng(
                &self.tones,
                MockAudio::new(),
                MockTimeProvider::new(),
                self.store(),
                SessionOptions {
                    clef_mode: mode,
                    sound_enabled: true,
                },
                StdRng::seed_from_u64(7),
            )
        }
    }

    fn force(session: &mut GameSession<'_, MockAudio, MockTimeProvider>, name: NoteName) {
        session.set_current_note(Note::new(name, Clef::Treble));
    }

    fn wrong_index(name: NoteName) -> usize {
        (name.index() + 1) % NOTE_COUNT
    }

    #[test]
    fn fresh_session_state() {
        let fx = Fixture::new();
        let session = fx.session(ClefMode::Mixed);
        let snap = session.snapshot();
        assert_eq!(snap.score, 0);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.combo, 0);
        assert_eq!(snap.time_limit_ms, 10_000);
        assert_eq!(snap.time_remaining_ms, 10_000);
        assert!(snap.sound_enabled);
        assert_eq!(snap.feedback, None);
        assert_eq!(session.stats().sessions_played, 1);
    }

    #[test]
    fn first_round_plays_its_tone() {
        let fx = Fixture::new();
        let session = fx.session(ClefMode::Bass);
        let note = session.current_note();
        assert_eq!(
            session.audio().played(),
            &[ToneKey::new(Clef::Bass, note.name)]
        );
    }

    #[test]
    fn fixed_clef_modes_stay_on_their_clef() {
        let fx = Fixture::new();
        for (mode, clef) in [(ClefMode::Treble, Clef::Treble), (ClefMode::Bass, Clef::Bass)] {
            let mut session = fx.session(mode);
            for _ in 0..10 {
                session.start_round();
                assert_eq!(session.current_note().clef, clef);
            }
        }
    }

    #[test]
    fn mixed_mode_draws_both_clefs() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Mixed);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            session.start_round();
            seen.insert(session.current_note().clef);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn correct_answer_at_level_one_scores_ten() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Do);

        let feedback = session.submit_answer(0);

        assert_eq!(feedback, Feedback::Correct);
        assert_eq!(session.score().score, 10);
        assert_eq!(session.score().combo, 1);
    }

    #[test]
    fn combo_bonus_at_level_two() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.level = 2;
        session.score.combo = 2;
        session.score.score = 100;
        force(&mut session, NoteName::La);

        session.submit_answer(NoteName::La.index());

        // 10 × 2 + (3 - 1) × 2
        assert_eq!(session.score().score, 124);
        assert_eq!(session.score().level, 2);
        assert_eq!(session.score().combo, 3);
        assert_eq!(session.score().best_combo, 3);
    }

    #[test]
    fn wrong_answer_resets_combo_and_clamps_score() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.combo = 5;
        session.score.score = 3;
        force(&mut session, NoteName::Do);

        let feedback = session.submit_answer(1);

        assert_eq!(
            feedback,
            Feedback::Wrong {
                expected: NoteName::Do
            }
        );
        assert_eq!(session.score().combo, 0);
        assert_eq!(session.score().score, 0);
    }

    #[test]
    fn wrong_answer_costs_five() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.score = 40;
        force(&mut session, NoteName::Mi);
        session.submit_answer(wrong_index(NoteName::Mi));
        assert_eq!(session.score().score, 35);
    }

    #[test]
    fn out_of_range_answer_is_wrong() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Si);
        let feedback = session.submit_answer(42);
        assert!(!feedback.is_positive());
        assert_eq!(session.stats().note(NoteName::Si).attempts, 1);
    }

    #[test]
    fn best_combo_survives_a_miss() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        for _ in 0..3 {
            let name = session.current_note().name;
            session.submit_answer(name.index());
        }
        let name = session.current_note().name;
        session.submit_answer(wrong_index(name));
        assert_eq!(session.score().combo, 0);
        assert_eq!(session.score().best_combo, 3);
    }

    #[test]
    fn level_up_reports_and_shortens_rounds() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.score = 40;
        force(&mut session, NoteName::Fa);

        let feedback = session.submit_answer(NoteName::Fa.index());

        assert_eq!(feedback, Feedback::LevelUp { level: 2 });
        assert_eq!(session.score().level, 2);
        assert_eq!(session.snapshot().time_limit_ms, 9_500);
    }

    #[test]
    fn losing_points_never_lowers_level() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.score = 45;
        force(&mut session, NoteName::Sol);
        session.submit_answer(NoteName::Sol.index());
        assert_eq!(session.score().level, 2);

        for _ in 0..20 {
            let name = session.current_note().name;
            session.submit_answer(wrong_index(name));
        }
        assert_eq!(session.score().score, 0);
        assert_eq!(session.score().level, 2);
    }

    #[test]
    fn correct_answer_books_success_only() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Do);
        session.submit_answer(0);

        let stats = session.stats();
        assert_eq!(
            stats.note(NoteName::Do),
            NoteStats {
                attempts: 0,
                successes: 1
            }
        );
        assert_eq!(stats.correct_answers, 1);
        assert_eq!(stats.total_notes_answered, 1);
    }

    #[test]
    fn wrong_answer_books_attempt() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Do);
        session.submit_answer(1);

        let stats = session.stats();
        assert_eq!(stats.note(NoteName::Do).attempts, 1);
        assert_eq!(stats.note(NoteName::Do).successes, 0);
        assert_eq!(stats.correct_answers, 0);
        assert_eq!(stats.total_notes_answered, 1);
    }

    #[test]
    fn timeout_counts_as_miss() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.score.score = 20;
        session.score.combo = 4;
        force(&mut session, NoteName::La);

        assert_eq!(session.update(), None);
        session.clock().advance(10_000);
        assert!(!session.is_timed_out());
        session.clock().advance(1);
        assert!(session.is_timed_out());

        let feedback = session.update();
        assert_eq!(
            feedback,
            Some(Feedback::TimeUp {
                expected: NoteName::La
            })
        );
        assert_eq!(session.score().score, 15);
        assert_eq!(session.score().combo, 0);
        assert_eq!(session.stats().note(NoteName::La).attempts, 1);
        assert_eq!(session.stats().total_notes_answered, 1);
        // The next round started at the missed deadline.
        assert!(!session.is_timed_out());
        assert_eq!(session.time_remaining_ms(), 9_999);
    }

    #[test]
    fn idle_player_misses_every_expired_round() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        assert_eq!(session.audio().played().len(), 1);

        // Rounds start at 0, 10 000, .. 50 000 and all expire by 60 001.
        session.clock().advance(60_001);
        assert!(matches!(session.update(), Some(Feedback::TimeUp { .. })));

        assert_eq!(session.stats().total_notes_answered, 6);
        assert_eq!(session.score().score, 0);
        assert_eq!(session.time_remaining_ms(), 9_999);
        assert_eq!(session.update(), None);
        // Only the round now running was played.
        assert_eq!(session.audio().played().len(), 2);
    }

    #[test]
    fn time_remaining_counts_down_to_zero() {
        let fx = Fixture::new();
        let session = fx.session(ClefMode::Treble);
        session.clock().advance(2_500);
        assert_eq!(session.time_remaining_ms(), 7_500);
        assert!((session.snapshot().time_fraction() - 0.75).abs() < 1e-9);
        session.clock().advance(60_000);
        assert_eq!(session.time_remaining_ms(), 0);
        assert_eq!(session.snapshot().time_fraction(), 0.0);
    }

    #[test]
    fn feedback_fades_after_a_second() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Do);
        session.submit_answer(0);
        assert_eq!(session.snapshot().feedback, Some(Feedback::Correct));
        session.clock().advance(999);
        assert_eq!(session.visible_feedback(), Some(Feedback::Correct));
        session.clock().advance(1);
        assert_eq!(session.visible_feedback(), None);
    }

    #[test]
    fn toggle_sound_mutes_next_rounds() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        assert_eq!(session.audio().played().len(), 1);

        assert!(!session.toggle_sound());
        session.start_round();
        assert_eq!(session.audio().played().len(), 1);

        assert!(session.toggle_sound());
        session.start_round();
        assert_eq!(session.audio().played().len(), 2);
    }

    #[test]
    fn audio_failure_does_not_interrupt_play() {
        let fx = Fixture::new();
        let mut session = GameSession::with_rng(
            &fx.tones,
            MockAudio::failing(),
            MockTimeProvider::new(),
            fx.store(),
            SessionOptions::default(),
            StdRng::seed_from_u64(1),
        );
        let name = session.current_note().name;
        assert_eq!(session.submit_answer(name.index()), Feedback::Correct);
    }

    #[test]
    fn high_score_persists_when_beaten() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        session.stats.high_score = 100;
        session.score.score = 150;
        force(&mut session, NoteName::Do);

        session.submit_answer(0);

        assert_eq!(session.high_score(), session.score().score);
        let on_disk = fx.store().load();
        assert_eq!(on_disk.high_score, session.score().score);
    }

    #[test]
    fn high_score_not_written_unless_exceeded() {
        let fx = Fixture::new();
        let mut seeded = StatisticsRecord::default();
        seeded.high_score = 500;
        assert!(fx.store().save(&seeded));

        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Do);
        session.submit_answer(0);

        assert_eq!(session.high_score(), 500);
        // Nothing written during play: the file still holds the seed.
        assert_eq!(fx.store().load(), seeded);
    }

    #[test]
    fn finish_persists_counters_and_session_count() {
        let fx = Fixture::new();
        let mut session = fx.session(ClefMode::Treble);
        force(&mut session, NoteName::Re);
        session.submit_answer(wrong_index(NoteName::Re));
        let stats = session.finish();

        let on_disk = fx.store().load();
        assert_eq!(on_disk, stats);
        assert_eq!(on_disk.sessions_played, 1);
        assert_eq!(on_disk.note(NoteName::Re).attempts, 1);

        let next = fx.session(ClefMode::Treble);
        assert_eq!(next.stats().sessions_played, 2);
    }
}
