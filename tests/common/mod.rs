//! Shared test doubles: a scriptable recognizer backend and an event sink.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use voxstage::asr::{FeedOutcome, Recognizer, RecognizerFactory};
use voxstage::ResultEvent;

/// Counters observable from the test after the engine consumed the backend
#[derive(Default)]
pub struct BackendStats {
    pub feeds: AtomicUsize,
    pub resets: AtomicUsize,
    pub recreates: AtomicUsize,
}

/// Recognizer that replays a fixed script of feed outcomes, then keeps
/// reporting an empty partial. `final_payload` always yields `final_text`.
pub struct ScriptedRecognizer {
    script: VecDeque<FeedOutcome>,
    final_text: String,
    stats: Arc<BackendStats>,
}

impl ScriptedRecognizer {
    pub fn new(
        script: Vec<FeedOutcome>,
        final_text: &str,
        stats: Arc<BackendStats>,
    ) -> Self {
        Self {
            script: script.into(),
            final_text: final_text.to_string(),
            stats,
        }
    }
}

impl Recognizer for ScriptedRecognizer {
    fn feed(&mut self, _samples: &[i16]) -> anyhow::Result<FeedOutcome> {
        self.stats.feeds.fetch_add(1, Ordering::SeqCst);
        let next = self.script.pop_front();
        Ok(next.unwrap_or_else(|| FeedOutcome {
            accepted: false,
            payload: r#"{"partial" : ""}"#.to_string(),
        }))
    }

    fn final_payload(&mut self) -> anyhow::Result<String> {
        Ok(format!(r#"{{"text" : "{}"}}"#, self.final_text))
    }

    fn reset(&mut self) {
        self.stats.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn recreate(&mut self) -> anyhow::Result<()> {
        self.stats.recreates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn partial(text: &str) -> FeedOutcome {
    FeedOutcome {
        accepted: false,
        payload: format!(r#"{{"partial" : "{}"}}"#, text),
    }
}

pub fn accepted(text: &str) -> FeedOutcome {
    FeedOutcome {
        accepted: true,
        payload: format!(r#"{{"text" : "{}"}}"#, text),
    }
}

/// Factory producing one scripted backend per `load_model` call
pub fn scripted_factory(
    script: Vec<FeedOutcome>,
    final_text: &'static str,
    stats: Arc<BackendStats>,
) -> RecognizerFactory {
    let script = Mutex::new(Some(script));
    Box::new(move |_path, _rate| {
        let script = script.lock().unwrap().take().unwrap_or_default();
        Ok(Box::new(ScriptedRecognizer::new(
            script, final_text, Arc::clone(&stats),
        )))
    })
}

/// Collects emitted events together with the emitting thread
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<(ThreadId, ResultEvent)>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &ResultEvent) {
        self.events
            .lock()
            .unwrap()
            .push((std::thread::current().id(), event.clone()));
    }

    pub fn snapshot(&self) -> Vec<(ThreadId, ResultEvent)> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}
