use tracing::warn;

use crate::audio::{ToneCache, ToneKey};
use crate::model::note::{Clef, Note, NoteName};
use crate::traits::audio::AudioSink;

/// Free practice: pick a note to see where it sits on the staff and hear it.
/// No score, no timer, no statistics.
pub struct TrainingSession<'a, A: AudioSink> {
    tones: &'a ToneCache,
    audio: A,
    clef: Clef,
    shown: Option<Note>,
    sound_enabled: bool,
}

impl<'a, A: AudioSink> TrainingSession<'a, A> {
    pub fn new(tones: &'a ToneCache, audio: A, clef: Clef) -> Self {
        Self {
            tones,
            audio,
            clef,
            shown: None,
            sound_enabled: true,
        }
    }

    /// Show the note for an answer index on the current clef and play it.
    /// Returns None for indices past Si.
    pub fn select_note(&mut self, index: usize) -> Option<Note> {
        let name = NoteName::from_index(index)?;
        let note = Note::new(name, self.clef);
        self.shown = Some(note);
        if self.sound_enabled {
            let key = ToneKey::new(note.clef, note.name);
            match self.tones.get(key) {
                Some(tone) => {
                    if let Err(e) = self.audio.play(key, tone) {
                        warn!("Failed to play {key:?}: {e}");
                    }
                }
                None => warn!("no tone rendered for {key:?}"),
            }
        }
        Some(note)
    }

    /// Switch treble/bass. The shown note keeps its name and moves to its
    /// place on the new staff.
    pub fn change_clef(&mut self) -> Clef {
        self.clef = self.clef.toggled();
        if let Some(note) = self.shown {
            self.shown = Some(Note::new(note.name, self.clef));
        }
        self.clef
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    pub fn clef(&self) -> Clef {
        self.clef
    }

    pub fn shown_note(&self) -> Option<Note> {
        self.shown
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}
