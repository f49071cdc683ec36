//! Page Event Logger
//!
//! Structured page events (image acquired, analysis started/finished, stale
//! results) written through `tracing` so they land in the NDJSON file.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    DefaultLoaded {
        source: String,
        mime_type: String,
        bytes: usize,
    },
    DefaultLoadFailed {
        error_msg: String,
    },
    ImageAcquired {
        file_name: String,
        mime_type: String,
        bytes: usize,
    },
    UploadRejected {
        file_name: String,
        error_msg: String,
    },
    AnalysisStarted {
        token: u64,
    },
    AnalysisCompleted {
        token: u64,
        provider: String,
        chars: usize,
    },
    AnalysisFailed {
        token: u64,
        error_msg: String,
    },
    StaleResultDiscarded {
        token: u64,
        latest: u64,
    },
}

impl PageEvent {
    fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::DefaultLoadFailed { .. } | Self::UploadRejected { .. } | Self::AnalysisFailed { .. }
        )
    }
}

#[derive(Debug, Serialize)]
pub struct PageEventEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: PageEvent,
}

pub struct PageEventLogger;

impl PageEventLogger {
    /// Build a redacted log entry for an event.
    pub fn entry(session_id: &str, mut event: PageEvent) -> PageEventEntry {
        match &mut event {
            PageEvent::DefaultLoaded { source, .. } => {
                *source = redact_sensitive_data(source);
            }
            PageEvent::DefaultLoadFailed { error_msg }
            | PageEvent::UploadRejected { error_msg, .. }
            | PageEvent::AnalysisFailed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            _ => {}
        }

        PageEventEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        }
    }

    /// Logs a page event, serializing it to the tracing system.
    pub fn log_event(session_id: &str, event: PageEvent) {
        let failure = event.is_failure();
        let entry = Self::entry(session_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        if failure {
            warn!(target: "page_events", event = %payload, "Page event");
        } else {
            info!(target: "page_events", event = %payload, "Page event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_tagged_and_redacted() {
        let entry = PageEventLogger::entry(
            "session-1",
            PageEvent::AnalysisFailed {
                token: 3,
                error_msg: "failed for url https://x.test/?key=abc123".into(),
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["session_id"], "session-1");
        assert_eq!(json["event"]["type"], "analysis_failed");
        assert_eq!(json["event"]["token"], 3);
        assert!(!json["event"]["error_msg"].as_str().unwrap().contains("abc123"));
    }

    #[test]
    fn stale_discard_is_not_a_failure() {
        assert!(!PageEvent::StaleResultDiscarded { token: 1, latest: 2 }.is_failure());
        assert!(PageEvent::UploadRejected { file_name: "a.txt".into(), error_msg: "x".into() }.is_failure());
    }
}
