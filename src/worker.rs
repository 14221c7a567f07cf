//! Background recognition worker
//!
//! Owns the single decode thread: polls the staging buffer, feeds the
//! recognizer, and pushes transcript events through the host callback. The
//! loop never blocks on the producer; silence costs one short sleep per
//! poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::asr::Recognizer;
use crate::buffer::AudioBuffer;
use crate::error::{EngineError, EngineResult};
use crate::transcript::{extract_field, EventKind, ResultEvent, TranscriptExtractor};

/// Recognizer handle shared between the worker and the control plane.
///
/// Single-writer in practice: only the loop touches it while running, and
/// `stop` joins the thread before the flush path takes the lock again.
pub type SharedRecognizer = Arc<Mutex<Box<dyn Recognizer>>>;

/// Registered host result handler; invoked synchronously on the worker
/// thread (or the stopping thread for the trailing flush), never two
/// invocations at once.
pub type SharedCallback = Arc<Mutex<Option<Box<dyn Fn(&ResultEvent) + Send>>>>;

/// Controls the single background decode thread
pub struct RecognitionWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    recognizer: Option<SharedRecognizer>,
    callback: Option<SharedCallback>,
}

impl RecognitionWorker {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
            recognizer: None,
            callback: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawn the poll loop. Errors if a worker thread already exists.
    pub fn start(
        &mut self,
        buffer: Arc<AudioBuffer>,
        recognizer: SharedRecognizer,
        callback: SharedCallback,
        chunk_frames: usize,
        poll_interval: Duration,
    ) -> EngineResult<()> {
        if self.handle.is_some() {
            return Err(EngineError::WorkerAlreadyRunning);
        }

        self.running.store(true, Ordering::Release);

        let running = Arc::clone(&self.running);
        let loop_recognizer = Arc::clone(&recognizer);
        let loop_callback = Arc::clone(&callback);
        let spawned = thread::Builder::new()
            .name("voxstage-worker".to_string())
            .spawn(move || {
                poll_loop(
                    running,
                    buffer,
                    loop_recognizer,
                    loop_callback,
                    chunk_frames,
                    poll_interval,
                )
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.running.store(false, Ordering::Release);
                return Err(EngineError::Other(e.into()));
            }
        };

        self.handle = Some(handle);
        self.recognizer = Some(recognizer);
        self.callback = Some(callback);
        info!("🎙️ Recognition worker started");
        Ok(())
    }

    /// Signal the loop, join the thread, then flush a trailing final result
    /// and reset the recognizer. The join must complete before the flush
    /// touches the recognizer; that ordering is what keeps the loop's own
    /// final emission and the stop-triggered flush from racing.
    ///
    /// Safe to call when no worker is running.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Recognition worker panicked before join");
            }
            info!("🛑 Recognition worker stopped");
        }

        let recognizer = self.recognizer.take();
        let callback = self.callback.take();
        if let (Some(recognizer), Some(callback)) = (recognizer, callback) {
            flush_final(&recognizer, &callback);
        }
    }
}

impl Default for RecognitionWorker {
    fn default() -> Self {
        Self::new()
    }
}

fn poll_loop(
    running: Arc<AtomicBool>,
    buffer: Arc<AudioBuffer>,
    recognizer: SharedRecognizer,
    callback: SharedCallback,
    chunk_frames: usize,
    poll_interval: Duration,
) {
    let mut extractor = TranscriptExtractor::new();
    debug!(
        "poll loop up: chunk_frames={}, poll_interval={:?}",
        chunk_frames, poll_interval
    );

    while running.load(Ordering::Acquire) {
        let chunk = buffer.pop(chunk_frames);
        if chunk.is_empty() {
            thread::sleep(poll_interval);
            continue;
        }

        let outcome = {
            let mut rec = recognizer.lock().unwrap_or_else(PoisonError::into_inner);
            rec.feed(&chunk)
        };

        match outcome {
            Ok(outcome) => {
                let event = if outcome.accepted {
                    extractor.on_final(&outcome.payload)
                } else {
                    extractor.on_partial(&outcome.payload)
                };
                if let Some(event) = event {
                    emit(&callback, &event);
                }
            }
            Err(e) => {
                warn!("Recognizer feed failed, dropping chunk: {}", e);
            }
        }

        // Paces the loop even under continuous audio
        thread::sleep(poll_interval);
    }

    debug!("poll loop exited");
}

/// Flush the decoder's trailing result and reset it for the next session.
/// Only called once the loop thread is joined.
fn flush_final(recognizer: &SharedRecognizer, callback: &SharedCallback) {
    let mut rec = recognizer.lock().unwrap_or_else(PoisonError::into_inner);
    match rec.final_payload() {
        Ok(payload) => {
            if let Some(text) = extract_field(&payload, "text") {
                if !text.is_empty() {
                    emit(
                        callback,
                        &ResultEvent {
                            kind: EventKind::Final,
                            text,
                        },
                    );
                }
            }
        }
        Err(e) => warn!("Final flush failed: {}", e),
    }
    rec.reset();
}

fn emit(callback: &SharedCallback, event: &ResultEvent) {
    let cb = callback.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(cb) = cb.as_ref() {
        cb(event);
    }
}
