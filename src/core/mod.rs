//! core
//!
//! Process-level building blocks shared by every command.
//!
//! # Modules
//!
//! - [`config`] - Configuration schema, loading, and alias persistence
//! - [`agent`] - AI agent detection and the User-Agent string
//! - [`time`] - Time parameter parsing (`now`, `1h`, RFC3339, unix ms)
//! - [`files`] - Request bodies read from disk or stdin
//!
//! # Design Principles
//!
//! - Environment access goes through an injected lookup so resolution is
//!   testable without touching process state
//! - Nothing here performs network I/O

pub mod agent;
pub mod config;
pub mod files;
pub mod time;

/// Environment lookup used during resolution.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Read a variable from the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// `1` or `true` (case-insensitive).
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
