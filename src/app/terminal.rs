//! Line-based terminal front end.
//!
//! The staff is drawn as text, one row per note step, top line first. Each
//! line the player types is decoded with [`InputEvent::parse`].

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::game::SessionSnapshot;
use crate::model::note::{
    Clef, LEDGER_LINE_Y, NOTE_COUNT, Note, NoteName, STAFF_LINE_COUNT, STAFF_LINE_SPACING,
    STAFF_TOP_Y,
};
use crate::traits::input::{InputEvent, InputSource};

const STAFF_WIDTH: usize = 24;
const NOTE_COLUMN: usize = 11;
const TIMER_WIDTH: usize = 20;

/// Reads commands from a buffered reader, one per line.
/// Unrecognized lines are reported on `out` and skipped.
pub struct StdinInput<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> StdinInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }
}

impl<R: BufRead, W: Write> InputSource for StdinInput<R, W> {
    fn next_event(&mut self) -> Option<InputEvent> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    debug!("input closed: {e}");
                    return None;
                }
            }
            if line.trim().is_empty() {
                continue;
            }
            match InputEvent::parse(&line) {
                Some(event) => return Some(event),
                None => {
                    if let Err(e) = writeln!(self.out, "? {}  (1-7, m, c, q)", line.trim()) {
                        warn!("Failed to write prompt: {e}");
                    }
                }
            }
        }
    }
}

/// Draw the five staff lines for `clef` with `note` on its row.
pub fn render_staff(clef: Clef, note: Option<Note>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} clef", clef.label());

    let staff_bottom = STAFF_TOP_Y + STAFF_LINE_SPACING * (STAFF_LINE_COUNT as i32 - 1);
    let mut y = STAFF_TOP_Y;
    while y <= LEDGER_LINE_Y {
        let on_row = note.filter(|n| n.vertical_position == y);
        let mut row: Vec<char> = if y <= staff_bottom {
            vec!['─'; STAFF_WIDTH]
        } else {
            vec![' '; STAFF_WIDTH]
        };
        if let Some(n) = on_row {
            if n.needs_ledger_line() {
                for cell in &mut row[NOTE_COLUMN - 2..=NOTE_COLUMN + 2] {
                    *cell = '─';
                }
            }
            row[NOTE_COLUMN] = '●';
        }
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "  {}", line.trim_end());
        y += STAFF_LINE_SPACING;
    }
    out
}

/// Answer buttons, numbered the way the number keys are.
pub fn render_buttons() -> String {
    (0..NOTE_COUNT)
        .filter_map(NoteName::from_index)
        .map(|name| format!("[{}] {}", name.index() + 1, name.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Score line, timer bar and any visible feedback.
pub fn render_hud(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score {}  Level {}  Combo {} (best {})  High {}  Sound {}",
        snapshot.score,
        snapshot.level,
        snapshot.combo,
        snapshot.best_combo,
        snapshot.high_score,
        if snapshot.sound_enabled { "on" } else { "off" },
    );

    let filled = (snapshot.time_fraction() * TIMER_WIDTH as f64).round() as usize;
    let filled = filled.min(TIMER_WIDTH);
    let _ = writeln!(
        out,
        "[{}{}] {:.1}s",
        "#".repeat(filled),
        ".".repeat(TIMER_WIDTH - filled),
        snapshot.time_remaining_ms as f64 / 1000.0,
    );

    if let Some(feedback) = snapshot.feedback {
        let _ = writeln!(out, "{feedback}");
    }
    out
}

/// Full game frame.
pub fn render_game(snapshot: &SessionSnapshot) -> String {
    format!(
        "{}\n{}{}\n> ",
        render_hud(snapshot),
        render_staff(snapshot.note.clef, Some(snapshot.note)),
        render_buttons(),
    )
}

/// Full training frame.
pub fn render_training(clef: Clef, note: Option<Note>, sound_enabled: bool) -> String {
    let caption = match note {
        Some(n) => format!("{} ({} Hz)", n.name, n.frequency_hz().round()),
        None => "pick a note".to_string(),
    };
    format!(
        "Training  Sound {}  [c] change clef\n{}\n{}{}\n> ",
        if sound_enabled { "on" } else { "off" },
        caption,
        render_staff(clef, note),
        render_buttons(),
    )
}
