//! agent command - Schema output for AI coding assistants

use anyhow::Result;

use crate::cli::args::AgentAction;
use crate::cli::schema::schema_for;
use crate::session::Session;

pub fn run(session: &mut Session, action: AgentAction) -> Result<()> {
    match action {
        AgentAction::Schema { path } => {
            let schema = schema_for(&path);
            session.println(serde_json::to_string_pretty(&schema)?)
        }
    }
}
