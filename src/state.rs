//! Engine lifecycle state
//!
//! The state is read from arbitrary host threads (`state()`, `is_initialized()`)
//! while lifecycle operations mutate it, so it lives in an atomic cell.
//! Transition checks themselves are check-then-set; the engine serializes
//! lifecycle operations under its control-plane lock, which is what makes
//! that adequate.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of the speech engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    Uninitialized = 0,
    Initialized = 1,
    ModelLoaded = 2,
    Recognizing = 3,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "UNINITIALIZED",
            EngineState::Initialized => "INITIALIZED",
            EngineState::ModelLoaded => "MODEL_LOADED",
            EngineState::Recognizing => "RECOGNIZING",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => EngineState::Initialized,
            2 => EngineState::ModelLoaded,
            3 => EngineState::Recognizing,
            _ => EngineState::Uninitialized,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomically shared engine state cell
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: EngineState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub fn get(&self) -> EngineState {
        EngineState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, state: EngineState) {
        self.0.store(state as u8, Ordering::Release);
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(EngineState::Uninitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(EngineState::Uninitialized.as_str(), "UNINITIALIZED");
        assert_eq!(EngineState::Initialized.as_str(), "INITIALIZED");
        assert_eq!(EngineState::ModelLoaded.as_str(), "MODEL_LOADED");
        assert_eq!(EngineState::Recognizing.as_str(), "RECOGNIZING");
    }

    #[test]
    fn test_cell_round_trip() {
        let cell = StateCell::default();
        assert_eq!(cell.get(), EngineState::Uninitialized);

        cell.set(EngineState::Recognizing);
        assert_eq!(cell.get(), EngineState::Recognizing);

        cell.set(EngineState::ModelLoaded);
        assert_eq!(cell.get(), EngineState::ModelLoaded);
    }
}
