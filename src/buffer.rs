//! Bounded audio staging buffer
//!
//! Sits between the capture thread (push) and the recognition worker (pop).
//! Overflow drops the oldest samples so a stalled consumer can never reject
//! or delay the producer. There is deliberately no condition variable: the
//! worker polls, trading tens of milliseconds of latency for a design with
//! no missed-wakeup hazard.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Default capacity: 10 seconds of mono audio at 16 kHz
pub const DEFAULT_MAX_FRAMES: usize = 16_000 * 10;

/// Thread-safe bounded FIFO of 16-bit PCM samples
#[derive(Debug)]
pub struct AudioBuffer {
    inner: Mutex<VecDeque<i16>>,
    max_frames: usize,
}

impl AudioBuffer {
    pub fn new(max_frames: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(max_frames.min(DEFAULT_MAX_FRAMES))),
            max_frames,
        }
    }

    /// Append samples, evicting the oldest buffered audio on overflow.
    ///
    /// Never blocks beyond the lock and never rejects input; a push larger
    /// than the whole capacity keeps only its newest `max_frames` samples.
    pub fn push(&self, samples: &[i16]) {
        let mut buf = self.lock();
        buf.extend(samples.iter().copied());
        if buf.len() > self.max_frames {
            let overflow = buf.len() - self.max_frames;
            buf.drain(..overflow);
        }
    }

    /// Remove and return up to `max_out` of the oldest samples.
    ///
    /// Returns fewer (including zero) if fewer are buffered; an empty result
    /// is a normal "nothing yet", not an error.
    pub fn pop(&self, max_out: usize) -> Vec<i16> {
        let mut buf = self.lock();
        let n = max_out.min(buf.len());
        buf.drain(..n).collect()
    }

    /// Discard all buffered samples
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A poisoned lock only means a panicking thread died mid-push/pop; the
    // sample queue itself is still well-formed, so keep going.
    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<i16>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAMES)
    }
}
