//! alias command - Manage command shortcuts

use anyhow::{bail, Context as _, Result};
use serde_json::Value;

use crate::cli::alias::{is_reserved_name, is_valid_alias_name};
use crate::cli::args::AliasAction;
use crate::session::Session;
use crate::ui::output::OutputFormat;

pub fn run(session: &mut Session, action: AliasAction) -> Result<()> {
    match action {
        AliasAction::List => list(session),
        AliasAction::Set { name, command } => set(session, &name, &command),
        AliasAction::Delete { names } => {
            for name in &names {
                let path = session
                    .config_mut()
                    .delete_alias(name)
                    .with_context(|| format!("failed to delete alias '{}'", name))?;
                tracing::debug!(path = %path.display(), alias = %name, "alias deleted");
                session.println(format!("Alias '{}' deleted.", name))?;
            }
            Ok(())
        }
        AliasAction::Import { file } => {
            let count = session
                .config_mut()
                .import_aliases(&file)
                .context("failed to import aliases")?;
            session.println(format!("Imported {} alias(es) from {}.", count, file.display()))
        }
    }
}

fn list(session: &mut Session) -> Result<()> {
    let aliases = session.config().aliases.clone();
    let as_table = session.config().output == OutputFormat::Table && !session.config().agent_mode;

    if as_table {
        if aliases.is_empty() {
            return session.println("No aliases configured.");
        }
        let width = aliases.keys().map(String::len).max().unwrap_or(0);
        for (name, command) in &aliases {
            session.println(format!("{:<width$}  {}", name, command, width = width))?;
        }
        return Ok(());
    }

    let data: Value = aliases
        .into_iter()
        .map(|(name, command)| serde_json::json!({ "name": name, "command": command }))
        .collect();
    session.emit_for("alias list", &data)
}

fn set(session: &mut Session, name: &str, command: &str) -> Result<()> {
    if !is_valid_alias_name(name) {
        bail!(
            "invalid alias name '{}': use only letters, digits, '-' and '_'",
            name
        );
    }
    if is_reserved_name(name) {
        bail!("'{}' is a built-in command and cannot be used as an alias", name);
    }
    if command.trim().is_empty() {
        bail!("alias command cannot be empty");
    }

    let path = session
        .config_mut()
        .set_alias(name, command)
        .context("failed to save alias")?;
    tracing::debug!(path = %path.display(), alias = %name, "alias saved");
    session.println(format!("Alias '{}' set to: {}", name, command))
}
