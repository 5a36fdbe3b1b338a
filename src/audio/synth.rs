//! Sine tone synthesis with a linear attack/release envelope.
//!
//! Output is 16-bit signed stereo PCM at [`SAMPLE_RATE`], normalized so the
//! loudest sample sits at full scale. Synthesis is a pure function of its
//! inputs: the same frequency and duration always give the same buffer.

use std::f64::consts::TAU;

/// Output sample rate in Hz.
pub const SAMPLE_RATE: u32 = 22_050;
/// Tone length used by the game when none is given.
pub const DEFAULT_DURATION_SECS: f64 = 0.5;
/// Attack ramp length in seconds (10 ms).
pub const ATTACK_SECS: f64 = 0.01;
/// Release ramp length in seconds (100 ms).
pub const RELEASE_SECS: f64 = 0.1;
/// Full-scale amplitude for signed 16-bit samples.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// One stereo sample: left and right channel.
pub type StereoFrame = [i16; 2];

/// Immutable PCM buffer produced by [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToneBuffer {
    frames: Vec<StereoFrame>,
}

impl ToneBuffer {
    /// A buffer of `len` silent frames.
    pub fn silent(len: usize) -> Self {
        Self {
            frames: vec![[0, 0]; len],
        }
    }

    fn from_mono(samples: Vec<i16>) -> Self {
        Self {
            frames: samples.into_iter().map(|s| [s, s]).collect(),
        }
    }

    /// Number of stereo frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[StereoFrame] {
        &self.frames
    }

    pub fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 / SAMPLE_RATE as f64
    }

    /// Largest absolute sample value over both channels.
    pub fn peak(&self) -> u16 {
        self.frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    pub fn is_silent(&self) -> bool {
        self.peak() == 0
    }
}

/// Number of frames for a duration, rounded down. Non-finite or negative
/// durations give zero frames.
pub fn frame_count(duration_secs: f64) -> usize {
    let n = (SAMPLE_RATE as f64 * duration_secs).floor();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// Render a sine tone of `frequency_hz` lasting `duration_secs`.
///
/// Steps:
/// 1. `n = floor(SAMPLE_RATE * duration)` samples at `t[i] = i * duration / n`
/// 2. `w[i] = sin(2π f t[i])`
/// 3. linear attack over the first `ATTACK_SECS` worth of samples: `w[i] *= i / attack`
/// 4. linear release over the last `RELEASE_SECS` worth: `w[n-1-i] *= i / release`
/// 5. scale so `max |w|` maps to 32767, truncate toward zero to `i16`
/// 6. duplicate into left/right
///
/// A non-positive frequency, or a waveform with no energy, yields a silent
/// buffer of the requested length instead of dividing by zero.
pub fn synthesize(frequency_hz: f64, duration_secs: f64) -> ToneBuffer {
    let n = frame_count(duration_secs);
    if n == 0 {
        return ToneBuffer::default();
    }
    if !(frequency_hz > 0.0 && frequency_hz.is_finite()) {
        return ToneBuffer::silent(n);
    }

    let step = duration_secs / n as f64;
    let mut wave: Vec<f64> = (0..n)
        .map(|i| (TAU * frequency_hz * (i as f64 * step)).sin())
        .collect();

    apply_envelope(&mut wave);

    let peak = wave.iter().fold(0.0_f64, |acc, w| acc.max(w.abs()));
    if !(peak > 0.0 && peak.is_finite()) {
        return ToneBuffer::silent(n);
    }

    let gain = FULL_SCALE / peak;
    // `as` truncates toward zero and saturates, so samples stay in i16 range.
    let samples = wave.iter().map(|w| (w * gain) as i16).collect();
    ToneBuffer::from_mono(samples)
}

/// [`synthesize`] with [`DEFAULT_DURATION_SECS`].
pub fn synthesize_default(frequency_hz: f64) -> ToneBuffer {
    synthesize(frequency_hz, DEFAULT_DURATION_SECS)
}

fn apply_envelope(wave: &mut [f64]) {
    let n = wave.len();
    let attack = (ATTACK_SECS * SAMPLE_RATE as f64) as usize;
    let release = (RELEASE_SECS * SAMPLE_RATE as f64) as usize;

    for i in 0..attack.min(n) {
        wave[i] *= i as f64 / attack as f64;
    }
    for i in 0..release.min(n) {
        wave[n - 1 - i] *= i as f64 / release as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn length_matches_duration() {
        assert_eq!(synthesize(440.0, 0.5).len(), 11_025);
        assert_eq!(synthesize(440.0, 1.0).len(), 22_050);
        // 22050 * 0.123 = 2712.15
        assert_eq!(synthesize(440.0, 0.123).len(), 2_712);
    }

    #[test]
    fn stereo_channels_are_identical() {
        let tone = synthesize(261.63, 0.5);
        assert!(tone.frames().iter().all(|[l, r]| l == r));
    }

    #[test]
    fn normalized_to_full_scale() {
        let tone = synthesize(440.0, 0.5);
        let peak = tone.peak();
        assert!(peak >= 32_766 && peak <= 32_767, "peak = {peak}");
    }

    #[test]
    fn envelope_starts_and_ends_at_zero() {
        let tone = synthesize(440.0, 0.5);
        assert_eq!(tone.frames()[0], [0, 0]);
        assert_eq!(tone.frames()[tone.len() - 1], [0, 0]);
        // Early attack samples are well below full scale.
        let early = tone.frames()[..20].iter().map(|f| f[0].unsigned_abs()).max();
        assert!(early.unwrap_or(0) < 5_000);
    }

    #[test]
    fn deterministic() {
        assert_eq!(synthesize(392.0, 0.25), synthesize(392.0, 0.25));
    }

    #[test]
    fn non_positive_frequency_is_silent() {
        let tone = synthesize(0.0, 0.5);
        assert_eq!(tone.len(), 11_025);
        assert!(tone.is_silent());

        let tone = synthesize(-440.0, 0.1);
        assert_eq!(tone.len(), 2_205);
        assert!(tone.is_silent());

        assert!(synthesize(f64::NAN, 0.1).is_silent());
    }

    #[test]
    fn non_positive_duration_is_empty() {
        assert!(synthesize(440.0, 0.0).is_empty());
        assert!(synthesize(440.0, -1.0).is_empty());
        assert!(synthesize(440.0, f64::NAN).is_empty());
    }

    #[test]
    fn zero_energy_waveform_is_silent() {
        // A single sample at t = 0: sin(0) = 0 and the attack weight is 0.
        let tone = synthesize(1000.0, 1.5 / SAMPLE_RATE as f64);
        assert_eq!(tone.len(), 1);
        assert!(tone.is_silent());
    }

    #[test]
    fn shorter_than_envelope_does_not_panic() {
        let tone = synthesize(440.0, 0.005);
        assert_eq!(tone.len(), 110);
    }

    #[test]
    fn default_duration() {
        assert_eq!(synthesize_default(440.0).len(), 11_025);
        assert!((synthesize_default(440.0).duration_secs() - 0.5).abs() < 1e-9);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn buffer_shape_holds(freq in 20.0f64..4_000.0, dur in 0.02f64..1.0) {
            let tone = synthesize(freq, dur);
            prop_assert_eq!(tone.len(), (SAMPLE_RATE as f64 * dur).floor() as usize);
            if !tone.is_silent() {
                let peak = tone.peak();
                prop_assert!(peak >= 32_766 && peak <= 32_767, "peak = {}", peak);
            }
        }
    }
}
