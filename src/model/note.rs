use serde::{Deserialize, Serialize};

/// Number of scale degrees a player can answer with.
pub const NOTE_COUNT: usize = 7;

/// Screen row of the top staff line.
pub const STAFF_TOP_Y: i32 = 290;
/// Vertical distance between two staff lines.
pub const STAFF_LINE_SPACING: i32 = 15;
/// Number of lines in a staff.
pub const STAFF_LINE_COUNT: usize = 5;
/// Notes at or below this row are drawn with a ledger line.
pub const LEDGER_LINE_Y: i32 = 380;

/// Scale degree of the C major scale, in fixed-do solfège.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NoteName {
    Do,
    #[serde(rename = "Ré")]
    Re,
    Mi,
    Fa,
    Sol,
    La,
    Si,
}

impl NoteName {
    /// Returns all note names in answer-button order.
    pub fn all() -> &'static [NoteName; NOTE_COUNT] {
        &[
            NoteName::Do,
            NoteName::Re,
            NoteName::Mi,
            NoteName::Fa,
            NoteName::Sol,
            NoteName::La,
            NoteName::Si,
        ]
    }

    /// Answer index (0 = Do, 6 = Si).
    pub fn index(self) -> usize {
        match self {
            NoteName::Do => 0,
            NoteName::Re => 1,
            NoteName::Mi => 2,
            NoteName::Fa => 3,
            NoteName::Sol => 4,
            NoteName::La => 5,
            NoteName::Si => 6,
        }
    }

    /// Create from an answer index. Returns None for indices past Si.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Display label, accents included.
    pub fn label(self) -> &'static str {
        match self {
            NoteName::Do => "Do",
            NoteName::Re => "Ré",
            NoteName::Mi => "Mi",
            NoteName::Fa => "Fa",
            NoteName::Sol => "Sol",
            NoteName::La => "La",
            NoteName::Si => "Si",
        }
    }

    /// Parse a label. Accepts the unaccented "Re" and ignores case.
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        let name = match lower.as_str() {
            "do" => NoteName::Do,
            "ré" | "re" => NoteName::Re,
            "mi" => NoteName::Mi,
            "fa" => NoteName::Fa,
            "sol" => NoteName::Sol,
            "la" => NoteName::La,
            "si" => NoteName::Si,
            _ => return None,
        };
        Some(name)
    }

    /// Frequency in Hz of this degree in octave 4 (C4..B4).
    pub fn frequency_hz(self) -> f64 {
        match self {
            NoteName::Do => 261.63,
            NoteName::Re => 293.66,
            NoteName::Mi => 329.63,
            NoteName::Fa => 349.23,
            NoteName::Sol => 392.00,
            NoteName::La => 440.00,
            NoteName::Si => 493.88,
        }
    }
}

impl std::fmt::Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reference clef of the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Clef {
    /// Clé de sol.
    Treble,
    /// Clé de fa.
    Bass,
}

impl Clef {
    pub fn all() -> &'static [Clef; 2] {
        &[Clef::Treble, Clef::Bass]
    }

    /// The other clef.
    pub fn toggled(self) -> Self {
        match self {
            Clef::Treble => Clef::Bass,
            Clef::Bass => Clef::Treble,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Clef::Treble => "Sol",
            Clef::Bass => "Fa",
        }
    }

    /// Pitch multiplier applied to the octave-4 reference frequencies.
    /// Bass clef tones sound one octave lower.
    pub fn octave_factor(self) -> f64 {
        match self {
            Clef::Treble => 1.0,
            Clef::Bass => 0.5,
        }
    }

    /// Scale degrees from the lowest to the highest position on this staff.
    pub fn ascending_notes(self) -> [NoteName; NOTE_COUNT] {
        use NoteName::*;
        match self {
            Clef::Treble => [Do, Re, Mi, Fa, Sol, La, Si],
            Clef::Bass => [Sol, La, Si, Do, Re, Mi, Fa],
        }
    }
}

impl std::fmt::Display for Clef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Which clefs a game draws notes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClefMode {
    Treble,
    Bass,
    #[default]
    Mixed,
}

impl ClefMode {
    /// The clef this mode always uses, or None when the clef is drawn per round.
    pub fn fixed_clef(self) -> Option<Clef> {
        match self {
            ClefMode::Treble => Some(Clef::Treble),
            ClefMode::Bass => Some(Clef::Bass),
            ClefMode::Mixed => None,
        }
    }
}

/// Staff row of a note on the treble clef.
fn treble_position(name: NoteName) -> i32 {
    match name {
        NoteName::Do => 380,
        NoteName::Re => 365,
        NoteName::Mi => 350,
        NoteName::Fa => 335,
        NoteName::Sol => 320,
        NoteName::La => 305,
        NoteName::Si => 290,
    }
}

/// Staff row of a note on the bass clef.
fn bass_position(name: NoteName) -> i32 {
    match name {
        NoteName::Sol => 380,
        NoteName::La => 365,
        NoteName::Si => 350,
        NoteName::Do => 335,
        NoteName::Re => 320,
        NoteName::Mi => 305,
        NoteName::Fa => 290,
    }
}

/// Screen row at which `name` is drawn on `clef`. Smaller rows are higher.
pub fn staff_position(name: NoteName, clef: Clef) -> i32 {
    match clef {
        Clef::Treble => treble_position(name),
        Clef::Bass => bass_position(name),
    }
}

/// A note shown on the staff for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub name: NoteName,
    pub clef: Clef,
    pub vertical_position: i32,
}

impl Note {
    pub fn new(name: NoteName, clef: Clef) -> Self {
        Self {
            name,
            clef,
            vertical_position: staff_position(name, clef),
        }
    }

    pub fn needs_ledger_line(&self) -> bool {
        self.vertical_position >= LEDGER_LINE_Y
    }

    /// Frequency of the tone played for this note.
    pub fn frequency_hz(&self) -> f64 {
        self.name.frequency_hz() * self.clef.octave_factor()
    }
}
