//! cli::alias
//!
//! User-defined command shorthands.
//!
//! # Resolution Order
//!
//! Built-in command names, and their clap aliases, are checked before any
//! user alias is looked up. An alias can never shadow a built-in, even when
//! the config file was edited by hand.
//!
//! # Quoting
//!
//! Alias bodies are split on whitespace outside `'...'` or `"..."`. An
//! unterminated quote runs to the end of the string; whatever was collected
//! is kept as the last token. Empty tokens, such as a bare `""`, are dropped.

use clap::CommandFactory;

use super::args::Cli;

/// Names that can never be used as aliases besides the built-in commands.
const RESERVED: &[&str] = &["help"];

/// Split an alias body into argument tokens.
pub fn split_command(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in command.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Expand `body` and append the caller's remaining arguments.
pub fn expand_alias(body: &str, rest: &[String]) -> Vec<String> {
    let mut expanded = split_command(body);
    expanded.extend(rest.iter().cloned());
    expanded
}

/// `name` is a top-level command or one of its declared aliases.
pub fn is_builtin_command(name: &str) -> bool {
    is_builtin_in(&Cli::command(), name)
}

fn is_builtin_in(cmd: &clap::Command, name: &str) -> bool {
    cmd.get_subcommands()
        .any(|sub| sub.get_name() == name || sub.get_all_aliases().any(|alias| alias == name))
}

/// Only ASCII letters, digits, `-` and `_`.
pub fn is_valid_alias_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `name` collides with a built-in, ignoring case.
pub fn is_reserved_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if RESERVED.contains(&lower.as_str()) {
        return true;
    }
    Cli::command().get_subcommands().any(|sub| {
        sub.get_name().eq_ignore_ascii_case(&lower)
            || sub
                .get_all_aliases()
                .any(|alias| alias.eq_ignore_ascii_case(&lower))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    mod split {
        use super::*;

        #[test]
        fn plain_words() {
            assert_eq!(
                split_command("monitors list   --tags=env:prod"),
                strings(&["monitors", "list", "--tags=env:prod"])
            );
        }

        #[test]
        fn double_quotes_keep_spaces() {
            assert_eq!(
                split_command(r#"tag add "my tag""#),
                strings(&["tag", "add", "my tag"])
            );
        }

        #[test]
        fn single_quotes_keep_spaces() {
            assert_eq!(
                split_command("monitors search --query='status:Alert env:prod'"),
                strings(&["monitors", "search", "--query=status:Alert env:prod"])
            );
        }

        #[test]
        fn quotes_nest_the_other_kind() {
            assert_eq!(
                split_command(r#"a "it's fine""#),
                strings(&["a", "it's fine"])
            );
        }

        #[test]
        fn empty_quotes_are_dropped() {
            assert_eq!(split_command(r#"a "" b"#), strings(&["a", "b"]));
            assert_eq!(split_command("x ''"), strings(&["x"]));
            assert_eq!(split_command(r#"--query="" list"#), strings(&["--query=", "list"]));
        }

        #[test]
        fn unterminated_quote_runs_to_end() {
            assert_eq!(
                split_command(r#"a "b c"#),
                strings(&["a", "b c"])
            );
        }

        #[test]
        fn blank_input() {
            assert!(split_command("   ").is_empty());
        }
    }

    mod expand {
        use super::*;

        #[test]
        fn appends_trailing_args() {
            assert_eq!(
                expand_alias("logs search --query=x", &strings(&["--limit=5"])),
                strings(&["logs", "search", "--query=x", "--limit=5"])
            );
        }

        #[test]
        fn no_trailing_args() {
            assert_eq!(
                expand_alias("slos list", &[]),
                strings(&["slos", "list"])
            );
        }
    }

    mod names {
        use super::*;

        #[test]
        fn builtins() {
            assert!(is_builtin_command("monitors"));
            assert!(is_builtin_command("alias"));
            assert!(is_builtin_command("status-pages"));
            assert!(!is_builtin_command("prod-monitors"));
        }

        #[test]
        fn valid_names() {
            assert!(is_valid_alias_name("prod-monitors"));
            assert!(is_valid_alias_name("my_alias2"));
            assert!(!is_valid_alias_name(""));
            assert!(!is_valid_alias_name("has space"));
            assert!(!is_valid_alias_name("semi;colon"));
        }

        #[test]
        fn reserved_names_ignore_case() {
            assert!(is_reserved_name("Monitors"));
            assert!(is_reserved_name("HELP"));
            assert!(!is_reserved_name("prod-monitors"));
        }
    }
}
