//! Canonical event names for structured logging
//!
//! The `event` field of every lifecycle log line carries one of these.

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
