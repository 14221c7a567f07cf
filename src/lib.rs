//! Voxstage
//!
//! Stages live microphone audio and drives an incremental speech
//! recognition session, delivering partial and final transcript events to a
//! host callback. The host pushes PCM from its capture thread; a single
//! background worker drains the staging buffer, feeds the recognizer
//! backend and emits deduplicated events.

pub mod asr;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod transcript;
pub mod worker;

pub use config::EngineConfig;
pub use engine::SpeechEngine;
pub use error::{EngineError, EngineResult};
pub use state::EngineState;
pub use transcript::{EventKind, ResultEvent};
