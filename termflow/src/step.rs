//! # Step Model
//!
//! A step is one declared unit of interaction (prompt) or work (task)
//! within a command's sequence. Descriptors are created at builder-chain
//! time, consumed at most once during traversal, and never mutated.
//!
//! Declaration order is execution order. Each step carries a skip
//! predicate over the values accumulated so far; the predicate is
//! evaluated lazily, immediately before the step would run, because it
//! may depend on a value written by an earlier step in the same pass.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use indexmap::IndexMap;
use serde_json::Value;

use crate::context::StepValues;

/// Predicate deciding whether a step is bypassed
pub type SkipFn = Box<dyn Fn(&StepValues) -> bool + Send + Sync>;

/// A `{key, value}` pair produced by a task handler
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    pub key: String,
    pub value: Value,
}

impl StepOutput {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Read-only snapshot of the context handed to a task handler
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Values accumulated by the steps completed so far
    pub values: StepValues,
    /// Parsed options for this invocation
    pub options: IndexMap<String, Value>,
}

/// Boxed future returned by a task handler
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<Option<StepOutput>>> + Send>>;

/// Boxed task handler
pub type TaskFn = Box<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// Interaction flavor of a prompt step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Pick exactly one of the declared choices
    Select,
    /// Pick any subset of the declared choices
    MultiSelect,
    /// Yes/no confirmation
    Confirm,
    /// Free-text input
    Text,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PromptKind::Select => "select",
            PromptKind::MultiSelect => "multi-select",
            PromptKind::Confirm => "confirm",
            PromptKind::Text => "text",
        };
        write!(f, "{name}")
    }
}

/// Fully declared prompt, as seen by the prompt collaborator
#[derive(Debug, Clone)]
pub struct PromptStep {
    pub key: String,
    pub label: String,
    pub kind: PromptKind,
    /// Required for the selection kinds, empty otherwise
    pub choices: Vec<String>,
    pub default: Option<Value>,
}

/// Declaration builder for a prompt step
///
/// ```no_run
/// use termflow::OptionStep;
/// use serde_json::json;
///
/// let step = OptionStep::new("color")
///     .label("Pick a color")
///     .select(["red", "green"])
///     .default_value(json!("red"))
///     .skip(|values| values.get_bool("plain").unwrap_or(false));
/// ```
pub struct OptionStep {
    key: String,
    label: Option<String>,
    kind: PromptKind,
    choices: Vec<String>,
    default: Option<Value>,
    skip: Option<SkipFn>,
}

impl OptionStep {
    /// Start declaring a free-text prompt under `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            kind: PromptKind::Text,
            choices: Vec::new(),
            default: None,
            skip: None,
        }
    }

    /// Question shown to the user, also listed in help output
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Make this a single-choice selection over `choices`
    pub fn select<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = PromptKind::Select;
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Make this a multiple-choice selection over `choices`
    pub fn multi_select<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kind = PromptKind::MultiSelect;
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Make this a yes/no confirmation
    pub fn confirm(mut self) -> Self {
        self.kind = PromptKind::Confirm;
        self
    }

    /// Value used when the environment is non-interactive or the user
    /// accepts the default
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Bypass this step when the predicate returns true
    pub fn skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&StepValues) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Box::new(predicate));
        self
    }

    /// Validate the declaration and freeze it into a `Step`
    ///
    /// Panics when a selection kind has no choices: that declaration can
    /// never produce a value and is a programmer error.
    pub(crate) fn into_step(self) -> Step {
        if matches!(self.kind, PromptKind::Select | PromptKind::MultiSelect) {
            assert!(
                !self.choices.is_empty(),
                "termflow: {} step `{}` declared without choices",
                self.kind,
                self.key
            );
        }
        let label = self.label.unwrap_or_else(|| self.key.clone());
        Step {
            key: self.key.clone(),
            skip: self.skip,
            kind: StepKind::Prompt(PromptStep {
                key: self.key,
                label,
                kind: self.kind,
                choices: self.choices,
                default: self.default,
            }),
        }
    }
}

/// Declaration builder for an asynchronous task step
///
/// The handler receives a snapshot of the context and may return a
/// `StepOutput` to merge into the accumulated values. Returning `None`
/// leaves the values untouched.
pub struct TaskStep {
    key: String,
    label: Option<String>,
    handler: TaskFn,
    skip: Option<SkipFn>,
}

impl TaskStep {
    /// Declare a task under `key` with its async handler
    pub fn new<F, Fut>(key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<StepOutput>>> + Send + 'static,
    {
        Self {
            key: key.into(),
            label: None,
            handler: Box::new(move |ctx| Box::pin(handler(ctx))),
            skip: None,
        }
    }

    /// Message shown while the task runs
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Bypass this step when the predicate returns true
    pub fn skip<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&StepValues) -> bool + Send + Sync + 'static,
    {
        self.skip = Some(Box::new(predicate));
        self
    }

    pub(crate) fn into_step(self) -> Step {
        Step {
            key: self.key,
            skip: self.skip,
            kind: StepKind::Task {
                label: self.label,
                handler: self.handler,
            },
        }
    }
}

/// Frozen step descriptor, owned by a command until traversal consumes it
pub(crate) struct Step {
    pub key: String,
    pub skip: Option<SkipFn>,
    pub kind: StepKind,
}

pub(crate) enum StepKind {
    Prompt(PromptStep),
    Task {
        label: Option<String>,
        handler: TaskFn,
    },
}

impl Step {
    /// Help-text label for prompt steps; tasks are not listed as options
    pub fn option_label(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Prompt(prompt) => Some(prompt.label.as_str()),
            StepKind::Task { .. } => None,
        }
    }

    pub fn should_skip(&self, values: &StepValues) -> bool {
        self.skip.as_ref().is_some_and(|predicate| predicate(values))
    }
}
