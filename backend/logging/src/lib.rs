//! Telemetry and structured logging for SnakeLens.
//!
//! Handles log redaction, console and NDJSON file output, and page event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PageEvent, PageEventEntry, PageEventLogger};
pub use logger::{init_console_logger, init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
