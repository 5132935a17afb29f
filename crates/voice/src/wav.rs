//! Minimal 16-bit mono PCM WAV encoding and beep generation.

/// Generate a sine beep as 16-bit PCM samples.
///
/// A 30 ms fade-in/out envelope avoids clicks at the edges.
pub fn beep_samples(sample_rate: u32, duration_secs: f32, freq: f32, volume: f32) -> Vec<i16> {
    const FADE_SECS: f32 = 0.03;

    let frames = (duration_secs * sample_rate as f32) as usize;
    let mut samples = Vec::with_capacity(frames);

    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let env = (t / FADE_SECS)
            .min((duration_secs - t) / FADE_SECS)
            .clamp(0.0, 1.0);
        let sample = volume * env * (2.0 * std::f32::consts::PI * freq * t).sin();
        samples.push((sample.clamp(-1.0, 1.0) * 32767.0) as i16);
    }

    samples
}

/// Wrap 16-bit mono PCM samples in a WAV container.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * 2;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk: PCM, mono, 16-bit
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // channels
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes()); // block align
    out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }

    out
}
