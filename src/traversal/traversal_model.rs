use serde::Serialize;

/// Phase of one traversal step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPhase {
    Scanning,
    Matching,
    Filling,
    AwaitingButton,
    Continuing,
    Submitting,
    Terminating,
}

/// Per-run parameters. Defaults follow the suggested values; all of them
/// are overridable from the CLI or the config file.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Hard cap on traversal steps, against cyclic "next" buttons.
    pub max_steps: u32,
    /// Confidence floor: matches scoring below this are skipped, not filled.
    pub min_score: u8,
    /// How long the page source may wait for load-state settling.
    pub settle_ms: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_steps: 200,
            min_score: 30,
            settle_ms: 3000,
        }
    }
}

/// Snapshot of the three independent page-identity signals. Any one of them
/// differing from the previous step counts as "page changed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals {
    /// URL without its fragment.
    pub url: String,
    /// Fragment ("hash") part of the URL, empty when absent.
    pub hash: String,
    pub title: String,
}

impl PageSignals {
    /// Split a full URL into base and fragment.
    pub fn new(full_url: &str, title: &str) -> Self {
        let (url, hash) = match full_url.split_once('#') {
            Some((base, frag)) => (base.to_string(), frag.to_string()),
            None => (full_url.to_string(), String::new()),
        };
        Self {
            url,
            hash,
            title: title.to_string(),
        }
    }

    /// Which signal differs from `previous`, checked in priority order:
    /// URL, then hash, then title. None means no observable change, which
    /// does not gate anything (same-URL dynamic updates are common).
    pub fn changed_from(&self, previous: &PageSignals) -> Option<PageChange> {
        if self.url != previous.url {
            Some(PageChange::Url)
        } else if self.hash != previous.hash {
            Some(PageChange::Hash)
        } else if self.title != previous.title {
            Some(PageChange::Title)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageChange {
    Url,
    Hash,
    Title,
}

/// Mutable per-run state, owned exclusively by the traversal controller.
/// Created at run start, folded into a `RunReport` at run end.
#[derive(Debug, Default)]
pub struct TraversalState {
    pub step_count: u32,
    pub previous_signals: Option<PageSignals>,
    pub filled_fields: Vec<String>,
    pub failed_fields: Vec<String>,
    pub skipped_fields: Vec<String>,
    pub errors: Vec<String>,
    pub submitted: bool,
}

impl TraversalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_report(self) -> RunReport {
        RunReport {
            success: !self.filled_fields.is_empty() && self.failed_fields.is_empty(),
            filled_fields: self.filled_fields,
            failed_fields: self.failed_fields,
            skipped_fields: self.skipped_fields,
            errors: self.errors,
            steps_processed: self.step_count,
            submitted: self.submitted,
        }
    }
}

/// Final output of a traversal run. Always reflects partial progress:
/// successfully filled fields are never discarded because of a later
/// failure, so `success=false` with a non-empty `filled_fields` reads as
/// partial success, not total failure.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub success: bool,
    pub filled_fields: Vec<String>,
    pub failed_fields: Vec<String>,
    pub skipped_fields: Vec<String>,
    pub errors: Vec<String>,
    pub steps_processed: u32,
    pub submitted: bool,
}
