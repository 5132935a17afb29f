//! Speech synthesis for the companion app.
//!
//! Only the mock backend ships with this build: it answers every request
//! with a short sine beep in a WAV container, long enough to roughly match
//! the text length. The shape of the request mirrors what the app already
//! sends, so a real model can be slotted in behind the same interface.

pub mod synth;
pub mod wav;

pub use synth::{AudioOutput, SynthesisError, SynthesisRequest, synthesize};
