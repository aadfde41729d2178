use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::traversal::traversal_model::{PageChange, PageSignals, TraversalPhase};

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u32,

    pub phase: String,

    pub page: Option<String>,
    pub page_changed: Option<String>,

    pub fields_found: Option<usize>,
    pub elements_skipped: Option<usize>,

    pub field: Option<String>,
    pub matched_key: Option<String>,
    pub score: Option<u8>,

    pub action: Option<String>,
    pub note: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u32, phase: TraversalPhase) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_millis(),
            step,
            phase: format!("{:?}", phase),
            page: None,
            page_changed: None,
            fields_found: None,
            elements_skipped: None,
            field: None,
            matched_key: None,
            score: None,
            action: None,
            note: None,
        }
    }

    pub fn with_page(mut self, signals: &PageSignals) -> Self {
        self.page = Some(page_fingerprint(signals));
        self
    }

    pub fn with_page_change(mut self, change: Option<PageChange>) -> Self {
        self.page_changed = change.map(|c| format!("{:?}", c));
        self
    }

    pub fn with_fields_found(mut self, found: usize, skipped: usize) -> Self {
        self.fields_found = Some(found);
        self.elements_skipped = Some(skipped);
        self
    }

    pub fn with_field(mut self, field: impl ToString) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn with_match(mut self, key: Option<&str>, score: u8) -> Self {
        self.matched_key = key.map(|k| k.to_string());
        self.score = Some(score);
        self
    }

    pub fn with_action(mut self, action: impl ToString) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_note(mut self, note: impl ToString) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Short stable fingerprint of a page state, for correlating trace lines
/// without dumping full URLs into every event.
pub fn page_fingerprint(signals: &PageSignals) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(signals.url.as_bytes());
    hasher.update(b"#");
    hasher.update(signals.hash.as_bytes());
    hasher.update(b"|");
    hasher.update(signals.title.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
