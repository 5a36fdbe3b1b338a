use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::note::NoteName;

/// Per-note answer counters.
///
/// `attempts` counts missed rounds (wrong answer or timeout) and `successes`
/// counts correct ones; a correct answer does not also bump `attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteStats {
    pub attempts: u32,
    pub successes: u32,
}

impl NoteStats {
    /// Rounds recorded for this note in either counter.
    pub fn rounds(&self) -> u32 {
        self.attempts.saturating_add(self.successes)
    }

    /// Share of recorded rounds answered correctly, or None before any round.
    pub fn success_rate(&self) -> Option<f64> {
        let rounds = self.rounds();
        (rounds > 0).then(|| self.successes as f64 / rounds as f64)
    }
}

/// Persistent player statistics.
///
/// Missing fields fall back to zero one by one when loading. The note table
/// is only reachable through [`StatisticsRecord::note`] and friends, so every
/// record holds an entry for each of the seven notes and survives a
/// save/load round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsRecord {
    pub high_score: u32,
    pub total_notes_answered: u32,
    pub correct_answers: u32,
    pub sessions_played: u32,
    #[serde(deserialize_with = "deserialize_per_note")]
    per_note: BTreeMap<NoteName, NoteStats>,
}

impl Default for StatisticsRecord {
    fn default() -> Self {
        Self {
            high_score: 0,
            total_notes_answered: 0,
            correct_answers: 0,
            sessions_played: 0,
            per_note: full_note_table(),
        }
    }
}

fn full_note_table() -> BTreeMap<NoteName, NoteStats> {
    NoteName::all()
        .iter()
        .map(|&n| (n, NoteStats::default()))
        .collect()
}

/// Reads the note table by label, drops unknown labels and fills in any
/// note that is absent.
fn deserialize_per_note<'de, D>(deserializer: D) -> Result<BTreeMap<NoteName, NoteStats>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, NoteStats>::deserialize(deserializer)?;
    let mut table = full_note_table();
    for (label, stats) in raw {
        if let Some(name) = NoteName::from_label(&label) {
            table.insert(name, stats);
        }
    }
    Ok(table)
}

impl StatisticsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for a note.
    pub fn note(&self, name: NoteName) -> NoteStats {
        self.per_note.get(&name).copied().unwrap_or_default()
    }

    pub fn note_mut(&mut self, name: NoteName) -> &mut NoteStats {
        self.per_note.entry(name).or_default()
    }

    /// All seven notes in scale order.
    pub fn per_note(&self) -> &BTreeMap<NoteName, NoteStats> {
        &self.per_note
    }

    /// Book a correct answer.
    pub fn record_success(&mut self, name: NoteName) {
        let note = self.note_mut(name);
        note.successes = note.successes.saturating_add(1);
        self.correct_answers = self.correct_answers.saturating_add(1);
        self.total_notes_answered = self.total_notes_answered.saturating_add(1);
    }

    /// Book a wrong answer or a timeout.
    pub fn record_miss(&mut self, name: NoteName) {
        let note = self.note_mut(name);
        note.attempts = note.attempts.saturating_add(1);
        self.total_notes_answered = self.total_notes_answered.saturating_add(1);
    }

    /// Overall share of correct answers, or None before any answer.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total_notes_answered > 0)
            .then(|| self.correct_answers as f64 / self.total_notes_answered as f64)
    }

    /// Note with the lowest success rate among notes that have been seen.
    pub fn weakest_note(&self) -> Option<(NoteName, f64)> {
        self.per_note
            .iter()
            .filter_map(|(&name, stats)| stats.success_rate().map(|r| (name, r)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}
