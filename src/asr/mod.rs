//! Recognizer backend interface
//!
//! The engine never interprets acoustic content. It hands chunks of PCM to a
//! backend and gets back a boundary flag plus a structured payload string;
//! everything past that (field extraction, dedup) happens in `transcript`.

#[cfg(feature = "vosk")]
pub mod vosk;

use anyhow::Result;

#[cfg(feature = "vosk")]
pub use self::vosk::VoskRecognizer;

/// Outcome of feeding one chunk to the backend.
///
/// When `accepted` is true the decoder hit an utterance boundary and
/// `payload` is the complete-result document (field `"text"`); otherwise
/// `payload` is the partial document (field `"partial"`).
#[derive(Debug, Clone)]
pub struct FeedOutcome {
    pub accepted: bool,
    pub payload: String,
}

/// Trait for incremental recognition backends
pub trait Recognizer: Send {
    /// Process one chunk of 16-bit mono PCM
    fn feed(&mut self, samples: &[i16]) -> Result<FeedOutcome>;

    /// Flush a final result without feeding new audio (session stop path)
    fn final_payload(&mut self) -> Result<String>;

    /// Clear decoder state so the next utterance starts clean
    fn reset(&mut self);

    /// Tear down and rebuild the decoder from the retained model (full reset)
    fn recreate(&mut self) -> Result<()>;
}

/// Builds a backend from a model path and sample rate.
///
/// The engine owns exactly one factory; alternative backends (or test
/// doubles) come in through [`crate::SpeechEngine::with_recognizer_factory`].
pub type RecognizerFactory = Box<dyn Fn(&str, u32) -> Result<Box<dyn Recognizer>> + Send + Sync>;

/// Factory for the Vosk backend
#[cfg(feature = "vosk")]
pub fn vosk_factory() -> RecognizerFactory {
    Box::new(|model_path, sample_rate| {
        Ok(Box::new(VoskRecognizer::new(model_path, sample_rate)?))
    })
}
