//! Property-based tests for alias expansion, time parsing and output
//! rendering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use pup::cli::alias::{expand_alias, is_builtin_command, split_command};
use pup::cli::resolve_alias;
use pup::core::config::Config;
use pup::core::time::parse_time_millis_at;
use pup::ui::output::{format_output, OutputFormat};
use serde_json::Value;

/// A shell-safe word: no quotes, no whitespace.
fn plain_word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:=.,/@*-]{1,16}"
}

/// Runs of spaces and tabs between words.
fn separator() -> impl Strategy<Value = String> {
    "[ \t]{1,4}"
}

fn builtin_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "monitors",
        "dashboards",
        "slos",
        "cases",
        "alias",
        "auth",
        "status-pages",
        "on-call",
        "version",
    ])
}

proptest! {
    #[test]
    fn plain_words_split_back(words in prop::collection::vec(plain_word(), 1..8), sep in separator()) {
        let line = words.join(&sep);
        prop_assert_eq!(split_command(&line), words);
    }

    #[test]
    fn surrounding_whitespace_is_ignored(words in prop::collection::vec(plain_word(), 0..6)) {
        let line = format!("  {}\t", words.join(" "));
        prop_assert_eq!(split_command(&line), words);
    }

    #[test]
    fn quoted_phrase_is_one_token(words in prop::collection::vec(plain_word(), 2..5)) {
        let phrase = words.join(" ");
        let line = format!("monitors search --query=\"{}\"", phrase);
        let tokens = split_command(&line);
        prop_assert_eq!(tokens.len(), 3);
        prop_assert_eq!(&tokens[2], &format!("--query={}", phrase));
    }

    #[test]
    fn trailing_args_are_appended_verbatim(
        body in prop::collection::vec(plain_word(), 1..5),
        rest in prop::collection::vec(".{0,12}", 0..4),
    ) {
        let expanded = expand_alias(&body.join(" "), &rest);
        prop_assert_eq!(expanded.len(), body.len() + rest.len());
        prop_assert_eq!(&expanded[..body.len()], &body[..]);
        prop_assert_eq!(&expanded[body.len()..], &rest[..]);
    }

    #[test]
    fn builtins_are_never_expanded(name in builtin_name(), body in prop::collection::vec(plain_word(), 1..4)) {
        prop_assert!(is_builtin_command(name));

        let mut cfg = Config::default();
        cfg.aliases.insert(name.to_string(), body.join(" "));
        let args = vec![name.to_string(), "list".to_string()];
        prop_assert_eq!(resolve_alias(&args, &cfg), args);
    }

    #[test]
    fn relative_times_look_back(amount in 0i64..10_000, unit in prop::sample::select(vec!["s", "m", "h", "d", "w"])) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let now_ms = now.timestamp() * 1000;

        let millis = parse_time_millis_at(&format!("{}{}", amount, unit), now).unwrap();
        prop_assert!(millis <= now_ms);
        prop_assert_eq!((now_ms - millis) % 1000, 0);

        let negated = parse_time_millis_at(&format!("-{}{}", amount, unit), now).unwrap();
        prop_assert_eq!(millis, negated);
    }

    #[test]
    fn digit_strings_are_taken_as_millis(millis in 0i64..4_102_444_800_000) {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        prop_assert_eq!(parse_time_millis_at(&millis.to_string(), now).unwrap(), millis);
    }
}

/// Arbitrary JSON documents with nested arrays and objects. Floats are
/// quarter steps so they print and parse back exactly.
fn json_value(text: BoxedStrategy<String>) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        prop::sample::select(vec![u64::MAX, i64::MAX as u64]).prop_map(Value::from),
        Just(Value::from(i64::MIN)),
        (-4_000_000i32..4_000_000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        text.clone().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::btree_map(text.clone(), inner, 0..8)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}

/// Any unicode text, control characters included.
fn any_text() -> BoxedStrategy<String> {
    any::<String>().boxed()
}

/// Single-line unicode text that YAML scalars can carry unescaped.
fn yaml_text() -> BoxedStrategy<String> {
    prop_oneof!["[a-z0-9 :#,-]{0,10}", "[^\\p{C}\\p{Zl}\\p{Zp}]{0,10}"].boxed()
}

proptest! {
    #[test]
    fn json_output_parses_back(doc in json_value(any_text())) {
        let rendered = format_output(&doc, None, OutputFormat::Json, false).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn yaml_output_parses_back(doc in json_value(yaml_text())) {
        let rendered = format_output(&doc, None, OutputFormat::Yaml, false).unwrap();
        let parsed: Value = serde_yaml::from_str(&rendered).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn agent_envelope_wraps_data_unchanged(doc in json_value(any_text())) {
        let rendered = format_output(&doc, None, OutputFormat::Table, true).unwrap();
        let envelope: Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(envelope["status"].as_str(), Some("success"));
        prop_assert_eq!(&envelope["data"], &doc);
    }
}
