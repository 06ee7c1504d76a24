//! # Program Context
//!
//! Shared state for one program invocation: the invoked command, parsed
//! options, accumulated step values, and the registry of declared commands.
//!
//! One `Context` is created by the program factory and shared by reference
//! (`Arc<Mutex<_>>`) across every builder handle. It is never copied, so a
//! value merged by the active command's traversal is visible to every
//! later skip predicate and task handler.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::TermflowError;
use crate::step::Step;

/// Name under which the root builder registers itself
pub(crate) const DEFAULT_COMMAND_NAME: &str = "__default__";

/// Accumulated step values, keyed by step key
///
/// Keys are unique per run. Insertion order follows execution order and
/// the map grows monotonically: a merged value is never retracted, even
/// if a later step fails.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepValues {
    inner: IndexMap<String, Value>,
}

impl StepValues {
    /// Look up a value by step key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Look up a string value by step key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.inner.get(key).and_then(|v| v.as_str())
    }

    /// Look up a boolean value by step key
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.inner.get(key).and_then(|v| v.as_bool())
    }

    /// Check whether a step has produced a value
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of values produced so far
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether no step has produced a value yet
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over `(key, value)` pairs in execution order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Step keys in execution order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_str())
    }

    /// Merge a produced value; keys are unique per run
    pub(crate) fn insert(&mut self, key: String, value: Value) -> Result<(), TermflowError> {
        if self.inner.contains_key(&key) {
            return Err(TermflowError::DuplicateValue(key));
        }
        self.inner.insert(key, value);
        Ok(())
    }
}

/// Per-command metadata and pending steps
///
/// Populated at declaration time, independent of whether the command
/// ever activates. The option help map always contains the built-in
/// `help` and `version` entries.
pub(crate) struct CommandEntry {
    pub description: String,
    pub option_help: IndexMap<String, String>,
    pub steps: Vec<Step>,
}

impl CommandEntry {
    fn new(description: String) -> Self {
        let mut option_help = IndexMap::new();
        option_help.insert("help".to_string(), "Display help information".to_string());
        option_help.insert("version".to_string(), "Display version information".to_string());
        Self {
            description,
            option_help,
            steps: Vec::new(),
        }
    }

    fn has_step_key(&self, key: &str) -> bool {
        self.steps.iter().any(|s| s.key == key)
    }
}

/// Shared state for one program invocation
pub(crate) struct Context {
    /// Program name, used for the usage line and version output
    pub program_name: String,
    /// Program version, rendered by the `version` built-in
    pub version: String,
    /// Command the user invoked (`DEFAULT_COMMAND_NAME` when none given)
    pub current_command: String,
    /// Parsed flags; set once before any command runs, read-only afterwards
    pub options: IndexMap<String, Value>,
    /// Values produced by completed steps
    pub values: StepValues,
    /// Registry of every declared command
    pub commands: IndexMap<String, CommandEntry>,
}

/// Handle used by every builder to reach the single shared `Context`
pub(crate) type SharedContext = Arc<Mutex<Context>>;

impl Context {
    pub fn new(
        program_name: String,
        version: String,
        current_command: String,
        options: IndexMap<String, Value>,
    ) -> Self {
        Self {
            program_name,
            version,
            current_command,
            options,
            values: StepValues::default(),
            commands: IndexMap::new(),
        }
    }

    pub fn into_shared(self) -> SharedContext {
        Arc::new(Mutex::new(self))
    }

    /// Register a command's metadata; duplicate names are a programmer error
    pub fn register_command(&mut self, name: &str, description: String) {
        assert!(
            !self.commands.contains_key(name),
            "termflow: command `{name}` is already registered"
        );
        self.commands.insert(name.to_string(), CommandEntry::new(description));
    }

    /// Append a declared step to a command, validating key uniqueness
    pub fn declare_step(&mut self, command: &str, step: Step) {
        let entry = self
            .commands
            .get_mut(command)
            .unwrap_or_else(|| panic!("termflow: unknown command `{command}`"));
        assert!(
            !entry.has_step_key(&step.key),
            "termflow: duplicate step key `{}` in command `{command}`",
            step.key
        );
        if let Some(label) = step.option_label() {
            entry.option_help.insert(step.key.clone(), label.to_string());
        }
        entry.steps.push(step);
    }

    /// Names of the declared sub-commands, in declaration order
    pub fn subcommand_names(&self) -> Vec<String> {
        self.commands
            .keys()
            .filter(|name| name.as_str() != DEFAULT_COMMAND_NAME)
            .cloned()
            .collect()
    }

    /// Merge a produced value into the accumulated values
    pub fn merge_value(&mut self, key: String, value: Value) -> Result<(), TermflowError> {
        self.values.insert(key, value)
    }
}

/// Lock the shared context for a short, non-awaiting critical section
pub(crate) fn lock(shared: &SharedContext) -> MutexGuard<'_, Context> {
    shared.lock().expect("termflow: context mutex poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Context {
        Context::new(
            "prog".to_string(),
            "1.0.0".to_string(),
            DEFAULT_COMMAND_NAME.to_string(),
            IndexMap::new(),
        )
    }

    #[test]
    fn test_values_preserve_insertion_order() {
        let mut values = StepValues::default();
        values.insert("b".to_string(), json!(1)).unwrap();
        values.insert("a".to_string(), json!(2)).unwrap();
        values.insert("c".to_string(), json!(3)).unwrap();

        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_values_reject_duplicate_key() {
        let mut values = StepValues::default();
        values.insert("k".to_string(), json!(1)).unwrap();
        let err = values.insert("k".to_string(), json!(2)).unwrap_err();
        assert!(matches!(err, TermflowError::DuplicateValue(k) if k == "k"));
        assert_eq!(values.get("k"), Some(&json!(1)));
    }

    #[test]
    fn test_typed_accessors() {
        let mut values = StepValues::default();
        values.insert("s".to_string(), json!("text")).unwrap();
        values.insert("b".to_string(), json!(true)).unwrap();

        assert_eq!(values.get_str("s"), Some("text"));
        assert_eq!(values.get_bool("b"), Some(true));
        assert_eq!(values.get_str("b"), None);
        assert_eq!(values.get_bool("missing"), None);
    }

    #[test]
    fn test_register_command_populates_builtin_options() {
        let mut ctx = minimal();
        ctx.register_command("build", "Build the project".to_string());

        let entry = &ctx.commands["build"];
        assert!(entry.option_help.contains_key("help"));
        assert!(entry.option_help.contains_key("version"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_register_duplicate_command_panics() {
        let mut ctx = minimal();
        ctx.register_command("build", "first".to_string());
        ctx.register_command("build", "second".to_string());
    }

    #[test]
    fn test_subcommand_names_exclude_default() {
        let mut ctx = minimal();
        ctx.register_command(DEFAULT_COMMAND_NAME, "root".to_string());
        ctx.register_command("build", "Build".to_string());
        ctx.register_command("watch", "Watch".to_string());

        assert_eq!(ctx.subcommand_names(), vec!["build", "watch"]);
    }
}
