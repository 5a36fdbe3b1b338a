use std::collections::HashMap;
use std::io::Cursor;

use anyhow::{Result, anyhow};
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::StaticSoundData;

use super::synth::ToneBuffer;
use super::tone_cache::ToneKey;
use super::wav::encode_wav;
use crate::traits::audio::AudioSink;

/// Audio driver backed by kira.
///
/// Each tone is encoded to WAV and decoded by kira the first time it is
/// played; the decoded sound data is kept for later rounds.
pub struct AudioDriver {
    manager: AudioManager,
    sounds: HashMap<ToneKey, StaticSoundData>,
}

impl AudioDriver {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        let settings = AudioManagerSettings::default();
        let manager = AudioManager::<DefaultBackend>::new(settings)
            .map_err(|e| anyhow!("Failed to create audio manager: {e}"))?;
        Ok(Self {
            manager,
            sounds: HashMap::new(),
        })
    }

    fn sound_data(&mut self, key: ToneKey, tone: &ToneBuffer) -> Result<StaticSoundData> {
        if let Some(data) = self.sounds.get(&key) {
            return Ok(data.clone());
        }
        let bytes = encode_wav(tone)?;
        let data = StaticSoundData::from_cursor(Cursor::new(bytes))
            .map_err(|e| anyhow!("Failed to decode tone {key:?}: {e}"))?;
        self.sounds.insert(key, data.clone());
        Ok(data)
    }

    /// Number of decoded tones held by the driver.
    pub fn loaded_count(&self) -> usize {
        self.sounds.len()
    }
}

impl AudioSink for AudioDriver {
    fn play(&mut self, key: ToneKey, tone: &ToneBuffer) -> Result<()> {
        let data = self.sound_data(key, tone)?;
        self.manager
            .play(data)
            .map_err(|e| anyhow!("Failed to play tone {key:?}: {e}"))?;
        Ok(())
    }
}
