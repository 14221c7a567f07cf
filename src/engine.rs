//! Speech engine façade
//!
//! Composes the staging buffer, state machine, recognizer backend and
//! worker behind a small lifecycle surface. One engine per process is the
//! intended usage; the instance is explicitly constructed and caller-owned
//! rather than a hidden global.
//!
//! Lifecycle operations are idempotent where a redundant call already has
//! what it wants: hosts driven by UI/lifecycle events re-enter these calls
//! and must get success, not an error. Genuinely premature calls (loading a
//! model before `init`) stay hard failures.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::asr::RecognizerFactory;
use crate::buffer::AudioBuffer;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::state::{EngineState, StateCell};
use crate::transcript::ResultEvent;
use crate::worker::{RecognitionWorker, SharedCallback, SharedRecognizer};

/// Control-plane fields mutated only under the lifecycle lock
struct ControlPlane {
    recognizer: Option<SharedRecognizer>,
    worker: RecognitionWorker,
    model_path: Option<String>,
}

/// Incremental speech recognition engine.
///
/// All methods take `&self`; `push_audio` and the state queries may be
/// called from any thread concurrently with lifecycle operations, which are
/// serialized against each other internally.
pub struct SpeechEngine {
    config: EngineConfig,
    state: StateCell,
    buffer: Arc<AudioBuffer>,
    callback: SharedCallback,
    factory: RecognizerFactory,
    control: Mutex<ControlPlane>,
}

impl SpeechEngine {
    /// Engine backed by the Vosk recognizer
    #[cfg(feature = "vosk")]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_recognizer_factory(config, crate::asr::vosk_factory())
    }

    /// Engine with a caller-supplied recognizer factory
    pub fn with_recognizer_factory(config: EngineConfig, factory: RecognizerFactory) -> Self {
        let buffer = Arc::new(AudioBuffer::new(config.max_buffer_frames));
        Self {
            config,
            state: StateCell::default(),
            buffer,
            callback: Arc::new(Mutex::new(None)),
            factory,
            control: Mutex::new(ControlPlane {
                recognizer: None,
                worker: RecognitionWorker::new(),
                model_path: None,
            }),
        }
    }

    /// Register the result handler.
    ///
    /// Invoked synchronously on the worker thread (or on the stopping thread
    /// for the trailing flush); invocations are strictly serialized. Long
    /// blocking work here stalls the decode cadence.
    pub fn on_result<F>(&self, handler: F)
    where
        F: Fn(&ResultEvent) + Send + 'static,
    {
        let mut cb = self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        *cb = Some(Box::new(handler));
    }

    /// Bring the engine up. Redundant calls succeed without effect.
    pub fn init(&self) -> EngineResult<()> {
        let _ctl = self.control.lock()?;
        if self.state.get() != EngineState::Uninitialized {
            debug!("init(): already initialized, nothing to do");
            return Ok(());
        }
        self.state.set(EngineState::Initialized);
        info!("Engine initialized");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.state.get() != EngineState::Uninitialized
    }

    pub fn state(&self) -> EngineState {
        self.state.get()
    }

    /// Load a model and create the recognizer.
    ///
    /// No-op success when a model is already loaded; hard failure before
    /// `init`. A factory failure leaves the engine `Initialized` so the
    /// caller can retry with a different path.
    pub fn load_model(&self, path: &str) -> EngineResult<()> {
        let mut ctl = self.control.lock()?;
        match self.state.get() {
            EngineState::Uninitialized => Err(EngineError::InvalidState {
                op: "load_model",
                state: EngineState::Uninitialized,
            }),
            EngineState::ModelLoaded | EngineState::Recognizing => {
                debug!("load_model(): model already loaded, nothing to do");
                Ok(())
            }
            EngineState::Initialized => {
                let recognizer = (self.factory)(path, self.config.sample_rate)
                    .map_err(|e| EngineError::ModelLoad(e.to_string()))?;
                ctl.recognizer = Some(Arc::new(Mutex::new(recognizer)));
                ctl.model_path = Some(path.to_string());
                self.state.set(EngineState::ModelLoaded);
                info!("📦 Model loaded from: {}", path);
                Ok(())
            }
        }
    }

    /// Spawn the recognition worker. Redundant while recognizing; hard
    /// failure without a loaded model.
    pub fn start_recognition(&self) -> EngineResult<()> {
        let mut ctl = self.control.lock()?;
        match self.state.get() {
            EngineState::Recognizing => {
                debug!("start_recognition(): already recognizing, nothing to do");
                Ok(())
            }
            EngineState::ModelLoaded => {
                let recognizer = ctl
                    .recognizer
                    .as_ref()
                    .map(Arc::clone)
                    .ok_or(EngineError::InvalidState {
                        op: "start_recognition",
                        state: EngineState::ModelLoaded,
                    })?;
                ctl.worker.start(
                    Arc::clone(&self.buffer),
                    recognizer,
                    Arc::clone(&self.callback),
                    self.config.chunk_frames,
                    Duration::from_millis(self.config.poll_interval_ms),
                )?;
                self.state.set(EngineState::Recognizing);
                info!("Recognition started");
                Ok(())
            }
            state => Err(EngineError::InvalidState {
                op: "start_recognition",
                state,
            }),
        }
    }

    /// Stop the session: join the worker, flush the trailing final result,
    /// drop back to `ModelLoaded`. No-op when nothing is running; never
    /// fails so teardown is always safe to call.
    pub fn stop_recognition(&self) {
        let mut ctl = self.control_teardown();
        Self::stop_worker(&mut ctl, &self.state);
    }

    /// Tear everything down: stop recognition, free the recognizer and model,
    /// discard buffered audio. Callable in any state, always succeeds.
    pub fn shutdown(&self) {
        let mut ctl = self.control_teardown();
        Self::stop_worker(&mut ctl, &self.state);
        ctl.recognizer = None;
        ctl.model_path = None;
        self.buffer.clear();
        self.state.set(EngineState::Uninitialized);
        info!("Engine shut down");
    }

    /// Abort the session and rebuild the recognizer from the loaded model,
    /// discarding buffered audio. No-op when no model is loaded.
    pub fn full_reset(&self) {
        let mut ctl = self.control_teardown();
        let Some(recognizer) = ctl.recognizer.as_ref().map(Arc::clone) else {
            debug!("full_reset(): no model loaded, nothing to do");
            return;
        };

        Self::stop_worker(&mut ctl, &self.state);
        self.buffer.clear();

        let recreated = {
            let mut rec = recognizer.lock().unwrap_or_else(PoisonError::into_inner);
            rec.recreate()
        };
        match recreated {
            Ok(()) => {
                self.state.set(EngineState::ModelLoaded);
                info!("🔄 Engine reset, recognizer recreated");
            }
            Err(e) => {
                // Decoder is gone; keep the engine usable by falling back to
                // the pre-load state so the host can load again.
                warn!("full_reset(): recreate failed, dropping recognizer: {}", e);
                ctl.recognizer = None;
                ctl.model_path = None;
                self.state.set(EngineState::Initialized);
            }
        }
    }

    /// Stage captured audio. Valid in any state; with no session consuming
    /// it the samples are retained up to capacity under drop-oldest.
    pub fn push_audio(&self, samples: &[i16]) {
        self.buffer.push(samples);
    }

    /// Samples currently staged (diagnostics)
    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    fn stop_worker(ctl: &mut ControlPlane, state: &StateCell) {
        if ctl.worker.is_running() {
            ctl.worker.stop();
        }
        if state.get() == EngineState::Recognizing {
            state.set(EngineState::ModelLoaded);
            info!("Recognition stopped");
        }
    }

    // Teardown paths must not fail; a poisoned control lock is recovered
    // since every field it guards stays structurally valid.
    fn control_teardown(&self) -> std::sync::MutexGuard<'_, ControlPlane> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SpeechEngine {
    fn drop(&mut self) {
        // A live worker thread holds Arcs into the engine's internals; make
        // sure it is joined before the engine goes away.
        self.stop_recognition();
    }
}
