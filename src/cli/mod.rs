//! cli
//!
//! Command-line interface layer for pup.
//!
//! # Responsibilities
//!
//! - Resolve user aliases and parse arguments and global flags
//! - Answer `--help` with a JSON schema when an agent is driving
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. [`execute_with_args`] turns a raw argument
//! vector into exactly one of: schema output, an expanded alias, or a
//! parsed [`Command`], and awaits the handler on a current-thread runtime.
//! Handlers talk to the API only through the [`Session`].

pub mod alias;
pub mod args;
pub mod commands;
pub mod schema;

pub use args::{Cli, Command, Shell};

use anyhow::{Context as _, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing::debug;

use crate::core::config::Config;
use crate::session::Session;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(args: &[String]) -> Result<()> {
    let mut session = Session::from_env()?;
    execute_with_args(args, &mut session)
}

/// Execute one invocation. `args` excludes the program name.
///
/// # Errors
///
/// Usage errors come back as [`clap::Error`]; everything else is a
/// runtime failure from the handler.
pub fn execute_with_args(args: &[String], session: &mut Session) -> Result<()> {
    if wants_agent_help(args, session.config()) {
        let path: Vec<String> = command_word(args)
            .map(|pos| args[pos].clone())
            .into_iter()
            .collect();
        let schema = schema::schema_for(&path);
        return session.println(serde_json::to_string_pretty(&schema)?);
    }

    let argv = resolve_alias(args, session.config());
    let cli = match Cli::try_parse_from(std::iter::once("pup".to_string()).chain(argv)) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(session.out(), "{}", err.render())?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    session
        .config_mut()
        .apply_flags(cli.output, cli.yes, cli.agent);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(commands::dispatch(cli.command, session))
}

/// `-h`/`--help` while in agent mode, or alongside a literal `--agent`.
fn wants_agent_help(args: &[String], config: &Config) -> bool {
    let help = args.iter().any(|a| a == "-h" || a == "--help");
    help && (config.agent_mode || args.iter().any(|a| a == "--agent"))
}

/// Index of the first argument that is neither a flag nor the value of
/// `-o`/`--output`.
fn command_word(args: &[String]) -> Option<usize> {
    let mut iter = args.iter().enumerate();
    while let Some((pos, arg)) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                iter.next();
            }
            a if a.starts_with('-') => {}
            _ => return Some(pos),
        }
    }
    None
}

/// Expand a leading user alias.
///
/// The command word is looked up as an alias only when it is not a
/// built-in command name; built-ins always win, even over aliases
/// written into the config file by hand.
pub fn resolve_alias(args: &[String], config: &Config) -> Vec<String> {
    let Some(pos) = command_word(args) else {
        return args.to_vec();
    };
    let name = &args[pos];
    if alias::is_builtin_command(name) || alias::is_reserved_name(name) {
        return args.to_vec();
    }

    match config.alias(name) {
        Some(body) => {
            debug!(alias = %name, expansion = %body, "expanding alias");
            let mut expanded = args[..pos].to_vec();
            expanded.extend(alias::expand_alias(body, &args[pos + 1..]));
            expanded
        }
        None => args.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config_with(aliases: &[(&str, &str)]) -> Config {
        let mut cfg = Config::default();
        for (name, body) in aliases {
            cfg.aliases.insert(name.to_string(), body.to_string());
        }
        cfg
    }

    mod aliases {
        use super::*;

        #[test]
        fn expands_with_trailing_args() {
            let cfg = config_with(&[("prod", "monitors list --tags=env:prod")]);
            assert_eq!(
                resolve_alias(&strings(&["prod", "--limit=5"]), &cfg),
                strings(&["monitors", "list", "--tags=env:prod", "--limit=5"])
            );
        }

        #[test]
        fn keeps_leading_flags() {
            let cfg = config_with(&[("prod", "monitors list")]);
            assert_eq!(
                resolve_alias(&strings(&["--yes", "prod"]), &cfg),
                strings(&["--yes", "monitors", "list"])
            );
        }

        #[test]
        fn output_value_is_not_an_alias() {
            let cfg = config_with(&[("json", "slos list"), ("prod", "monitors list")]);
            assert_eq!(
                resolve_alias(&strings(&["-o", "json", "prod"]), &cfg),
                strings(&["-o", "json", "monitors", "list"])
            );
            assert_eq!(
                resolve_alias(&strings(&["--output=json", "prod"]), &cfg),
                strings(&["--output=json", "monitors", "list"])
            );
            let only_value = strings(&["--output", "json"]);
            assert_eq!(resolve_alias(&only_value, &cfg), only_value);
        }

        #[test]
        fn builtin_wins_over_alias() {
            let cfg = config_with(&[("monitors", "slos list")]);
            let args = strings(&["monitors", "list"]);
            assert_eq!(resolve_alias(&args, &cfg), args);
        }

        #[test]
        fn unknown_name_passes_through() {
            let cfg = config_with(&[]);
            let args = strings(&["nonexistent"]);
            assert_eq!(resolve_alias(&args, &cfg), args);
        }
    }

    mod agent_help {
        use super::*;

        #[test]
        fn needs_help_and_agent() {
            let mut cfg = Config::default();
            assert!(!wants_agent_help(&strings(&["--help"]), &cfg));
            assert!(wants_agent_help(&strings(&["--agent", "-h"]), &cfg));
            cfg.agent_mode = true;
            assert!(wants_agent_help(&strings(&["monitors", "--help"]), &cfg));
            assert!(!wants_agent_help(&strings(&["monitors", "list"]), &cfg));
        }

        fn help_json(args: &[&str]) -> serde_json::Value {
            use std::io::Cursor;
            use std::sync::{Arc, Mutex};

            #[derive(Clone, Default)]
            struct Buf(Arc<Mutex<Vec<u8>>>);
            impl std::io::Write for Buf {
                fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                    self.0.lock().unwrap().extend_from_slice(data);
                    Ok(data.len())
                }
                fn flush(&mut self) -> std::io::Result<()> {
                    Ok(())
                }
            }

            let out = Buf::default();
            let mut cfg = Config::default();
            cfg.agent_mode = true;
            let mut session = Session::new(cfg)
                .with_output(Box::new(out.clone()))
                .with_input(Box::new(Cursor::new(Vec::new())));
            execute_with_args(&strings(args), &mut session).unwrap();
            let bytes = out.0.lock().unwrap().clone();
            serde_json::from_slice(&bytes).unwrap()
        }

        #[test]
        fn flag_values_do_not_extend_the_path() {
            let doc = help_json(&["monitors", "search", "--query", "status:Alert", "--help"]);
            let commands = doc["commands"].as_array().unwrap();
            assert_eq!(commands.len(), 1);
            assert_eq!(commands[0]["full_path"], "monitors");
            assert!(doc["auth"].is_object());
            assert!(doc["best_practices"].is_array());
        }

        #[test]
        fn subtree_keeps_full_document() {
            let doc = help_json(&["monitors", "--help"]);
            assert_eq!(doc["commands"].as_array().unwrap().len(), 1);
            assert_eq!(doc["commands"][0]["name"], "monitors");
            assert!(doc["global_flags"].is_array());
            assert!(doc["query_syntax"].is_object());
            assert!(doc["time_formats"].is_object());
            assert!(doc["anti_patterns"].is_array());
            assert!(doc["version"].is_string());
        }

        #[test]
        fn dotted_path_selects_nested_command() {
            let doc = help_json(&["-o", "json", "monitors.search", "-h"]);
            assert_eq!(doc["commands"][0]["full_path"], "monitors search");
        }
    }
}
