//! Tone synthesis and playback.
//!
//! This module provides:
//! - [`synthesize`]: sine tone with attack/release envelope into 16-bit stereo PCM
//! - [`ToneCache`]: every (clef, note) tone rendered once at start-up
//! - [`encode_wav`] / [`write_wav`]: WAV encoding of a tone
//! - [`AudioDriver`]: kira-backed [`AudioSink`](crate::traits::audio::AudioSink)

mod audio_driver;
mod synth;
mod tone_cache;
mod wav;

pub use audio_driver::AudioDriver;
pub use synth::{
    ATTACK_SECS, DEFAULT_DURATION_SECS, FULL_SCALE, RELEASE_SECS, SAMPLE_RATE, StereoFrame,
    ToneBuffer, frame_count, synthesize, synthesize_default,
};
pub use tone_cache::{ToneCache, ToneKey};
pub use wav::{encode_wav, write_wav};
