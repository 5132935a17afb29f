use {
    bytes::Bytes,
    serde::Deserialize,
    thiserror::Error,
};

use orion_config::VoiceConfig;

use crate::wav;

const BEEP_FREQ_HZ: f32 = 440.0;
const BEEP_VOLUME: f32 = 0.2;
const MAX_DURATION_SECS: f32 = 2.5;

/// Request to synthesize speech from text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SynthesisRequest {
    /// Text to convert to speech.
    pub text: String,
    /// Output sample rate in Hz; falls back to the configured default.
    pub sample_rate: Option<u32>,
    /// Voice identifier (unused by the mock backend).
    pub voice: Option<String>,
    /// Language tag (unused by the mock backend).
    pub language: Option<String>,
    /// Speaking rate (unused by the mock backend).
    pub rate: Option<f32>,
    /// Pitch multiplier (unused by the mock backend).
    pub pitch: Option<f32>,
}

/// Synthesized audio ready to ship to the caller.
#[derive(Debug, Clone)]
pub struct AudioOutput {
    pub data: Bytes,
    pub mime_type: &'static str,
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("text is required")]
    EmptyText,

    #[error("no synthesis backend installed; enable voice.mock_audio")]
    BackendUnavailable,
}

/// Synthesize speech for `req`.
///
/// Mock mode produces a beep whose length loosely tracks the text length,
/// capped at 2.5 seconds. With mock mode disabled there is nothing to fall
/// back to: no real model ships with this build.
pub fn synthesize(req: &SynthesisRequest, cfg: &VoiceConfig) -> Result<AudioOutput, SynthesisError> {
    if req.text.trim().is_empty() {
        return Err(SynthesisError::EmptyText);
    }

    if !cfg.mock_audio {
        return Err(SynthesisError::BackendUnavailable);
    }

    let sample_rate = req.sample_rate.unwrap_or(cfg.sample_rate);
    let duration = MAX_DURATION_SECS.min(0.5 + 0.05 * req.text.len() as f32);

    let samples = wav::beep_samples(sample_rate, duration, BEEP_FREQ_HZ, BEEP_VOLUME);
    Ok(AudioOutput {
        data: Bytes::from(wav::encode_wav(&samples, sample_rate)),
        mime_type: "audio/wav",
    })
}
