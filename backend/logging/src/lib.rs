//! Structured logging for the activity log.
//!
//! Console plus rolling NDJSON file output, and redaction of message
//! bodies before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
