//! Observability subsystem.
//!
//! Runs are short batch jobs, so observability is structured logging only:
//! per-app routing decisions at debug, a one-line summary at info, and the
//! final diagnostic on failure.

pub mod logging;
