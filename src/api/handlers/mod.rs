//! API request handlers.

/// Health probes.
pub mod health;
/// Research pipeline handlers, blocking and streaming.
pub mod research;
