//! Pup - a CLI for the Datadog API, built for humans and AI agents
//!
//! Each subcommand turns typed flags into one REST call, sends it with
//! either a bearer token or an API key pair, and prints the response as
//! JSON, YAML, a table, or an agent envelope.
//!
//! # Architecture
//!
//! - [`auth`] - OAuth2 browser login, token storage and refresh
//! - [`cli`] - Argument parsing, alias resolution, agent schema, handlers
//! - [`session`] - Per-invocation context: config, output, API clients
//! - [`client`] - The [`DatadogApi`](client::DatadogApi) boundary, its
//!   HTTP implementation, and the bearer-token endpoint table
//! - [`core`] - Configuration, agent detection, time and file parsing
//! - [`secrets`] - Stored token backends
//! - [`ui`] - Output formatting, error hints, confirmation prompts
//!
//! # Invariants
//!
//! 1. A user alias never shadows a built-in command
//! 2. Endpoints that reject bearer tokens are never sent one
//! 3. Destructive commands ask first unless auto-approve is on
//! 4. Secrets are never logged

pub mod auth;
pub mod cli;
pub mod client;
pub mod core;
pub mod secrets;
pub mod session;
pub mod ui;
