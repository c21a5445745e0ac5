//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each resource handler:
//! 1. Turns its typed arguments into one [`ApiRequest`]
//! 2. Sends it through [`Session::call`], which picks the client and
//!    formats API failures
//! 3. Prints the result with [`Session::emit_for`]
//!
//! Destructive actions ask first through [`Session::confirm`]; a decline
//! is a successful no-op.
//!
//! # Async Commands
//!
//! Handlers that touch the network are async. `dispatch` is awaited once
//! on the current-thread runtime built in [`crate::cli::execute_with_args`].

mod agent;
mod alias;
mod api_keys;
mod auth;
mod cases;
mod cicd;
mod cloud;
mod completion;
mod dashboards;
mod downtime;
mod error_tracking;
mod events;
mod monitors;
mod notebooks;
mod on_call;
mod rum;
mod security;
mod slos;
mod status_pages;
mod synthetics;
mod test_cmd;
mod unsupported;

pub use unsupported::UnsupportedOperation;

use anyhow::Result;
use serde_json::Value;

use crate::cli::args::Command;
use crate::client::ApiRequest;
use crate::session::Session;

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, session: &mut Session) -> Result<()> {
    match command {
        // Utility
        Command::Auth { action } => auth::run(session, action).await,
        Command::Alias { action } => alias::run(session, action),
        Command::Agent { action } => agent::run(session, action),
        Command::Version => version(session),
        Command::Test => test_cmd::run(session),
        Command::Completion { shell } => completion::completion(session, shell),

        // Resources
        Command::Monitors { action } => monitors::run(session, action).await,
        Command::Dashboards { action } => dashboards::run(session, action).await,
        Command::Downtime { action } => downtime::run(session, action).await,
        Command::Events { action } => events::run(session, action).await,
        Command::Notebooks { action } => notebooks::run(session, action).await,
        Command::Slos { action } => slos::run(session, action).await,
        Command::Cases { action } => cases::run(session, action).await,
        Command::Cicd { action } => cicd::run(session, action).await,
        Command::Cloud { action } => cloud::run(session, action).await,
        Command::OnCall { action } => on_call::run(session, action).await,
        Command::Rum { action } => rum::run(session, action).await,
        Command::Security { action } => security::run(session, action).await,
        Command::StatusPages { action } => status_pages::run(session, action).await,
        Command::Synthetics { action } => synthetics::run(session, action).await,
        Command::ApiKeys { action } => api_keys::run(session, action).await,
        Command::ErrorTracking { action } => error_tracking::run(session, action).await,
        Command::Scorecards { action } => unsupported::scorecards(action),
        Command::ObsPipelines { action } => unsupported::obs_pipelines(action),
    }
}

fn version(session: &mut Session) -> Result<()> {
    session.println(format!("pup {}", env!("CARGO_PKG_VERSION")))
}

/// Send one request and print the result.
async fn show(
    session: &mut Session,
    command: &str,
    operation: &str,
    request: ApiRequest,
) -> Result<()> {
    let data = session.call(operation, request).await?;
    session.emit_for(command, &data)
}

/// Confirm, send a destructive request, and report the outcome.
///
/// Empty responses print `done`; anything else is printed like a result.
async fn destroy(
    session: &mut Session,
    command: &str,
    prompt: &str,
    operation: &str,
    request: ApiRequest,
    done: &str,
) -> Result<()> {
    if !session.confirm(prompt) {
        return Ok(());
    }
    let data = session.call(operation, request).await?;
    if data.is_null() {
        session.println(done)
    } else {
        session.emit_for(command, &data)
    }
}

/// `{"data": {"type": kind, "attributes": attributes}}`
fn json_api(kind: &str, attributes: Value) -> Value {
    serde_json::json!({
        "data": {
            "type": kind,
            "attributes": attributes,
        }
    })
}
