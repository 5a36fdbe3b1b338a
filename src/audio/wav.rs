//! 16-bit stereo WAV encoding of tone buffers.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::synth::ToneBuffer;

fn wav_spec(tone: &ToneBuffer) -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate: tone.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_frames<W: Write + Seek>(writer: W, tone: &ToneBuffer) -> Result<()> {
    let mut wav = hound::WavWriter::new(writer, wav_spec(tone)).context("Failed to start WAV")?;
    for &[left, right] in tone.frames() {
        wav.write_sample(left)?;
        wav.write_sample(right)?;
    }
    wav.finalize().context("Failed to finalize WAV")?;
    Ok(())
}

/// Encode a tone as an in-memory WAV file.
pub fn encode_wav(tone: &ToneBuffer) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_frames(&mut cursor, tone)?;
    Ok(cursor.into_inner())
}

/// Write a tone to a WAV file on disk.
pub fn write_wav(path: &Path, tone: &ToneBuffer) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    write_frames(std::io::BufWriter::new(file), tone)
}
