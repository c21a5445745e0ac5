//! ui
//!
//! User-facing rendering and interaction.
//!
//! # Modules
//!
//! - [`output`] - JSON, YAML, and table rendering plus the agent envelope
//! - [`errors`] - API failures turned into hints or structured errors
//! - [`prompts`] - Confirmations and masked input
//!
//! # Design
//!
//! Nothing here writes to stdout directly. Functions return strings or
//! take writers, and the session decides where text goes.

pub mod errors;
pub mod output;
pub mod prompts;
