use std::collections::HashMap;

use tracing::debug;

use super::synth::{DEFAULT_DURATION_SECS, ToneBuffer, synthesize};
use crate::model::note::{Clef, NoteName};

/// Cache key for a pre-rendered tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToneKey {
    pub clef: Clef,
    pub name: NoteName,
}

impl ToneKey {
    pub fn new(clef: Clef, name: NoteName) -> Self {
        Self { clef, name }
    }
}

/// Pre-rendered tones for every (clef, note) pair.
///
/// Built once at start-up and only read afterwards; sessions borrow it.
#[derive(Debug, Clone)]
pub struct ToneCache {
    tones: HashMap<ToneKey, ToneBuffer>,
    duration_secs: f64,
}

impl ToneCache {
    /// Render all 14 tones with the default duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_SECS)
    }

    /// Render all 14 tones with the given duration.
    pub fn with_duration(duration_secs: f64) -> Self {
        let mut tones = HashMap::with_capacity(Clef::all().len() * NoteName::all().len());
        for &clef in Clef::all() {
            for &name in NoteName::all() {
                let freq = name.frequency_hz() * clef.octave_factor();
                tones.insert(ToneKey::new(clef, name), synthesize(freq, duration_secs));
            }
        }
        debug!("rendered {} tones ({duration_secs}s each)", tones.len());
        Self {
            tones,
            duration_secs,
        }
    }

    /// Tone for a note. Always present for cache-built keys.
    pub fn get(&self, key: ToneKey) -> Option<&ToneBuffer> {
        self.tones.get(&key)
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

impl Default for ToneCache {
    fn default() -> Self {
        Self::new()
    }
}
