//! Vosk recognizer backend

use anyhow::{Context, Result};
use tracing::{debug, info};
use vosk::{DecodingState, Model};

use super::FeedOutcome;

/// Vosk-based recognizer.
///
/// Retains the loaded model so the decoder can be rebuilt in place on a full
/// reset without re-reading model files from disk.
pub struct VoskRecognizer {
    model: Model,
    recognizer: vosk::Recognizer,
    sample_rate: f32,
}

impl VoskRecognizer {
    /// Load a model from `model_path` and create a decoder for `sample_rate`
    pub fn new(model_path: &str, sample_rate: u32) -> Result<Self> {
        let path = std::path::Path::new(model_path);
        if !path.exists() {
            return Err(anyhow::anyhow!("Vosk model not found at {}", path.display()));
        }

        info!("Loading Vosk model from: {}", path.display());

        let model = Model::new(model_path).context("Failed to load Vosk model")?;
        let sample_rate = sample_rate as f32;
        let recognizer =
            vosk::Recognizer::new(&model, sample_rate).context("Failed to create Vosk recognizer")?;

        Ok(Self {
            model,
            recognizer,
            sample_rate,
        })
    }

    fn final_document(&mut self) -> String {
        let result = self.recognizer.final_result();
        let text = result.single().map(|s| s.text).unwrap_or_default();
        serde_json::json!({ "text": text }).to_string()
    }
}

impl super::Recognizer for VoskRecognizer {
    fn feed(&mut self, samples: &[i16]) -> Result<FeedOutcome> {
        match self.recognizer.accept_waveform(samples) {
            DecodingState::Finalized => Ok(FeedOutcome {
                accepted: true,
                payload: self.final_document(),
            }),
            DecodingState::Running => {
                let partial = self.recognizer.partial_result().partial.to_string();
                Ok(FeedOutcome {
                    accepted: false,
                    payload: serde_json::json!({ "partial": partial }).to_string(),
                })
            }
            DecodingState::Failed => {
                debug!("Decoding failed for this chunk");
                Ok(FeedOutcome {
                    accepted: false,
                    payload: String::new(),
                })
            }
        }
    }

    fn final_payload(&mut self) -> Result<String> {
        Ok(self.final_document())
    }

    fn reset(&mut self) {
        self.recognizer.reset();
    }

    fn recreate(&mut self) -> Result<()> {
        self.recognizer = vosk::Recognizer::new(&self.model, self.sample_rate)
            .context("Failed to recreate Vosk recognizer")?;
        debug!("Vosk recognizer recreated");
        Ok(())
    }
}
