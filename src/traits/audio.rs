use anyhow::Result;

use crate::audio::{ToneBuffer, ToneKey};

/// Abstraction over audio output.
/// Implementations: AudioDriver (kira), NullAudio (muted/no device), MockAudio (testing).
///
/// Playback is fire-and-forget: `play` submits the tone and returns without
/// waiting for it to finish.
pub trait AudioSink {
    fn play(&mut self, key: ToneKey, tone: &ToneBuffer) -> Result<()>;
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _key: ToneKey, _tone: &ToneBuffer) -> Result<()> {
        Ok(())
    }
}

/// Sink that records the keys it was asked to play.
#[derive(Debug, Default, Clone)]
pub struct MockAudio {
    played: Vec<ToneKey>,
    fail: bool,
}

impl MockAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `play` call fails.
    pub fn failing() -> Self {
        Self {
            played: Vec::new(),
            fail: true,
        }
    }

    pub fn played(&self) -> &[ToneKey] {
        &self.played
    }

    pub fn last_played(&self) -> Option<ToneKey> {
        self.played.last().copied()
    }
}

impl AudioSink for MockAudio {
    fn play(&mut self, key: ToneKey, _tone: &ToneBuffer) -> Result<()> {
        if self.fail {
            anyhow::bail!("mock audio failure");
        }
        self.played.push(key);
        Ok(())
    }
}

impl<A: AudioSink + ?Sized> AudioSink for Box<A> {
    fn play(&mut self, key: ToneKey, tone: &ToneBuffer) -> Result<()> {
        (**self).play(key, tone)
    }
}
