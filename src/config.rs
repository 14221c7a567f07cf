//! Engine configuration

use serde::{Deserialize, Serialize};

/// Tuning knobs for the recognition session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Input sample rate in Hz (mono, signed 16-bit PCM)
    pub sample_rate: u32,
    /// Staging buffer capacity in samples
    pub max_buffer_frames: usize,
    /// Samples handed to the recognizer per feed call.
    /// Keep this no larger than the decoder's practical chunk limit.
    pub chunk_frames: usize,
    /// Worker poll/pacing interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            max_buffer_frames: 160_000, // 10s at 16kHz
            chunk_frames: 4_000,        // 250ms at 16kHz
            poll_interval_ms: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.sample_rate, 16_000);
        assert_eq!(cfg.max_buffer_frames, 160_000);
        assert_eq!(cfg.chunk_frames, 4_000);
        assert_eq!(cfg.poll_interval_ms, 30);
    }

    #[test]
    fn test_serde_round_trip() {
        let cfg = EngineConfig {
            sample_rate: 8_000,
            max_buffer_frames: 80_000,
            chunk_frames: 2_000,
            poll_interval_ms: 20,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sample_rate, 8_000);
        assert_eq!(back.chunk_frames, 2_000);
    }
}
