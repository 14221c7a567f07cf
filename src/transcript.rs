//! Transcript extraction and event deduplication
//!
//! Recognizer payloads are small structured documents like
//! `{"partial" : "hello wor"}` or `{"text" : "hello world"}`. Extraction is a
//! narrow field scan rather than a full parser: a missing field or a
//! malformed value is a normal "nothing to say yet" and yields no event.

use serde::Serialize;
use tracing::debug;

/// Whether a transcript is provisional or committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Partial,
    Final,
}

/// A transcript event handed to the host callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub text: String,
}

impl ResultEvent {
    /// Wire form delivered to hosts that want a string payload:
    /// `{"type":"partial"|"final","text":"..."}`
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Pull the first quoted value following the quoted `field` key.
///
/// Returns `None` when the key is absent or no well-formed quoted value
/// follows it. Tolerates arbitrary spacing around the separator. Escaped
/// quotes inside the value are not handled; that matches what the decoder
/// actually emits for plain transcripts.
pub fn extract_field(payload: &str, field: &str) -> Option<String> {
    let key = format!("\"{}\"", field);
    let key_end = payload.find(&key)? + key.len();
    let rest = &payload[key_end..];
    let open = rest.find('"')?;
    let value = &rest[open + 1..];
    let close = value.find('"')?;
    Some(value[..close].to_string())
}

/// Turns raw recognizer payloads into deduplicated transcript events.
///
/// Keeps the last emitted partial text; an identical consecutive partial is
/// suppressed. Finals are never deduplicated, and emitting one resets the
/// partial comparison so the next partial is always distinct.
#[derive(Debug, Default)]
pub struct TranscriptExtractor {
    last_partial: String,
}

impl TranscriptExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partial payload → event, unless empty or a repeat of the last partial
    pub fn on_partial(&mut self, payload: &str) -> Option<ResultEvent> {
        let text = extract_field(payload, "partial")?;
        if text.is_empty() || text == self.last_partial {
            return None;
        }
        debug!("partial: '{}'", text);
        self.last_partial = text.clone();
        Some(ResultEvent {
            kind: EventKind::Partial,
            text,
        })
    }

    /// Final payload → event, unless empty. Resets partial dedup state.
    pub fn on_final(&mut self, payload: &str) -> Option<ResultEvent> {
        let text = extract_field(payload, "text")?;
        self.last_partial.clear();
        if text.is_empty() {
            return None;
        }
        Some(ResultEvent {
            kind: EventKind::Final,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_field_basic() {
        assert_eq!(
            extract_field(r#"{"text" : "hello world"}"#, "text"),
            Some("hello world".to_string())
        );
        assert_eq!(
            extract_field(r#"{"partial":"he"}"#, "partial"),
            Some("he".to_string())
        );
    }

    #[test]
    fn test_extract_field_missing_or_malformed() {
        assert_eq!(extract_field(r#"{"partial" : "x"}"#, "text"), None);
        assert_eq!(extract_field("", "text"), None);
        assert_eq!(extract_field("not a payload at all", "text"), None);
        // Unterminated value
        assert_eq!(extract_field(r#"{"text" : "oops"#, "text"), None);
        // Key with no value
        assert_eq!(extract_field(r#"{"text" : }"#, "text"), None);
    }

    #[test]
    fn test_extract_field_empty_value() {
        assert_eq!(
            extract_field(r#"{"text" : ""}"#, "text"),
            Some(String::new())
        );
    }

    #[test]
    fn test_partial_dedup() {
        let mut ex = TranscriptExtractor::new();
        let ev = ex.on_partial(r#"{"partial" : "hello"}"#);
        assert_eq!(
            ev,
            Some(ResultEvent {
                kind: EventKind::Partial,
                text: "hello".to_string()
            })
        );
        // Identical repeat is suppressed
        assert_eq!(ex.on_partial(r#"{"partial" : "hello"}"#), None);
        // Grown text gets through
        let ev = ex.on_partial(r#"{"partial" : "hello world"}"#);
        assert_eq!(ev.unwrap().text, "hello world");
    }

    #[test]
    fn test_empty_partial_suppressed() {
        let mut ex = TranscriptExtractor::new();
        assert_eq!(ex.on_partial(r#"{"partial" : ""}"#), None);
    }

    #[test]
    fn test_final_resets_dedup() {
        let mut ex = TranscriptExtractor::new();
        assert!(ex.on_partial(r#"{"partial" : "hello"}"#).is_some());

        let fin = ex.on_final(r#"{"text" : "hello"}"#).unwrap();
        assert_eq!(fin.kind, EventKind::Final);
        assert_eq!(fin.text, "hello");

        // Same text as the pre-final partial, but dedup was reset
        assert!(ex.on_partial(r#"{"partial" : "hello"}"#).is_some());
    }

    #[test]
    fn test_empty_final_suppressed_but_still_resets() {
        let mut ex = TranscriptExtractor::new();
        assert!(ex.on_partial(r#"{"partial" : "hi"}"#).is_some());
        assert_eq!(ex.on_final(r#"{"text" : ""}"#), None);
        assert!(ex.on_partial(r#"{"partial" : "hi"}"#).is_some());
    }

    #[test]
    fn test_finals_never_deduplicated() {
        let mut ex = TranscriptExtractor::new();
        assert!(ex.on_final(r#"{"text" : "again"}"#).is_some());
        assert!(ex.on_final(r#"{"text" : "again"}"#).is_some());
    }

    #[test]
    fn test_event_json_shape() {
        let ev = ResultEvent {
            kind: EventKind::Final,
            text: "done".to_string(),
        };
        assert_eq!(ev.to_json(), r#"{"type":"final","text":"done"}"#);

        let ev = ResultEvent {
            kind: EventKind::Partial,
            text: "do".to_string(),
        };
        assert_eq!(ev.to_json(), r#"{"type":"partial","text":"do"}"#);
    }
}
