//! # Argument Source
//!
//! One pass over the argument vector producing `{command, options}`.
//! This is deliberately not a full argument grammar: the first non-flag
//! token names the command, flags are consumed verbatim, and everything
//! else is ignored. Commands read the resulting option map as-is.

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::DEFAULT_COMMAND_NAME;

/// Result of parsing one argument vector
#[derive(Debug, Clone)]
pub(crate) struct ParsedArguments {
    /// Invoked command, or the default sentinel when none was named
    pub command: String,
    /// Flag name → parsed value
    pub options: IndexMap<String, Value>,
}

/// Parse an argument vector (without the program name token)
///
/// Recognized forms: `--key=value`, `--key value`, bare `--flag` (true),
/// and the single-dash variants of each. Scalar values are coerced to
/// booleans or numbers where they parse as such, otherwise kept as
/// strings.
pub(crate) fn parse_arguments<I>(args: I) -> ParsedArguments
where
    I: IntoIterator<Item = String>,
{
    let mut command: Option<String> = None;
    let mut options = IndexMap::new();
    let mut args = args.into_iter().peekable();

    while let Some(token) = args.next() {
        if let Some(name) = flag_name(&token) {
            if let Some((name, value)) = name.split_once('=') {
                options.insert(name.to_string(), coerce(value));
                continue;
            }
            // `--key value` only after the command token has been seen;
            // before it, flags are bare and values need the `=` form, so
            // a leading flag can never swallow the command name.
            let takes_value =
                command.is_some() && args.peek().is_some_and(|next| flag_name(next).is_none());
            if takes_value {
                let value = args.next().unwrap_or_default();
                options.insert(name.to_string(), coerce(&value));
            } else {
                options.insert(name.to_string(), Value::Bool(true));
            }
            continue;
        }
        if command.is_none() {
            command = Some(token);
        }
        // Stray positional tokens after the command are ignored.
    }

    ParsedArguments {
        command: command.unwrap_or_else(|| DEFAULT_COMMAND_NAME.to_string()),
        options,
    }
}

fn flag_name(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-').filter(|rest| !rest.is_empty()))
        .filter(|rest| !rest.starts_with('-'))
}

fn coerce(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> ParsedArguments {
        parse_arguments(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_empty_invocation_selects_default_command() {
        let parsed = parse(&[]);
        assert_eq!(parsed.command, DEFAULT_COMMAND_NAME);
        assert!(parsed.options.is_empty());
    }

    #[test]
    fn test_first_non_flag_token_is_the_command() {
        let parsed = parse(&["build", "--release"]);
        assert_eq!(parsed.command, "build");
        assert_eq!(parsed.options.get("release"), Some(&json!(true)));
    }

    #[test]
    fn test_key_equals_value() {
        let parsed = parse(&["--port=8080", "--name=demo"]);
        assert_eq!(parsed.options.get("port"), Some(&json!(8080)));
        assert_eq!(parsed.options.get("name"), Some(&json!("demo")));
    }

    #[test]
    fn test_key_then_value() {
        let parsed = parse(&["build", "--target", "arm", "--jobs", "4"]);
        assert_eq!(parsed.command, "build");
        assert_eq!(parsed.options.get("target"), Some(&json!("arm")));
        assert_eq!(parsed.options.get("jobs"), Some(&json!(4)));
    }

    #[test]
    fn test_bare_help_flag_stays_boolean() {
        let parsed = parse(&["--help", "build"]);
        assert_eq!(parsed.options.get("help"), Some(&json!(true)));
        assert_eq!(parsed.command, "build");
    }

    #[test]
    fn test_leading_flag_value_needs_equals_form() {
        let parsed = parse(&["--name", "foo"]);
        assert_eq!(parsed.options.get("name"), Some(&json!(true)));
        assert_eq!(parsed.command, "foo");

        let parsed = parse(&["--name=foo"]);
        assert_eq!(parsed.options.get("name"), Some(&json!("foo")));
        assert_eq!(parsed.command, DEFAULT_COMMAND_NAME);
    }

    #[test]
    fn test_boolean_coercion() {
        let parsed = parse(&["--reload=false"]);
        assert_eq!(parsed.options.get("reload"), Some(&json!(false)));
    }

    #[test]
    fn test_short_flags() {
        let parsed = parse(&["build", "-v"]);
        assert_eq!(parsed.options.get("v"), Some(&json!(true)));
    }
}
