//! # Prompt Collaborator
//!
//! Collects values for prompt steps. The step orchestration core only
//! sees the `Prompt` trait; the implementations here cover interactive
//! terminals (`StdinPrompt`), non-interactive environments
//! (`DefaultsPrompt`), and tests (`ScriptedPrompt`).

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use serde_json::Value;

use crate::error::TermflowError;
use crate::step::{PromptKind, PromptStep};

/// Collaborator that produces a value for a prompt step
pub trait Prompt: Send {
    /// Obtain a value honoring the step's kind, choices and default
    fn ask(&mut self, step: &PromptStep) -> Result<Value, TermflowError>;
}

/// Interactive prompt reading answers from stdin
///
/// Empty input accepts the default value. Selection kinds accept either
/// the 1-based index or the exact choice text. At end of input (Ctrl-D)
/// the step resolves to its default; a step with no default fails with
/// a prompt error rather than re-asking forever.
pub struct StdinPrompt {
    /// Injected line source; `None` reads the process stdin
    source: Option<Box<dyn BufRead + Send>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self { source: None }
    }

    #[cfg(test)]
    fn with_source(source: impl BufRead + Send + 'static) -> Self {
        Self {
            source: Some(Box::new(source)),
        }
    }

    /// Read one trimmed line; `None` means the input reached EOF
    fn read_line(&mut self) -> Result<Option<String>, TermflowError> {
        io::stdout().flush()?;
        let mut input = String::new();
        let read = match self.source.as_mut() {
            Some(source) => source.read_line(&mut input)?,
            None => io::stdin().read_line(&mut input)?,
        };
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }

    /// Resolve a step whose input reached EOF
    fn resolve_eof(step: &PromptStep) -> Result<Value, TermflowError> {
        step.default.clone().ok_or_else(|| {
            TermflowError::prompt(format!(
                "input closed while `{}` had no default to fall back on",
                step.key
            ))
        })
    }

    fn ask_text(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        match &step.default {
            Some(default) => print!("{} [{}]: ", step.label, display_default(default)),
            None => print!("{}: ", step.label),
        }
        match self.read_line()? {
            None => Self::resolve_eof(step),
            Some(input) if input.is_empty() => Ok(step.default.clone().unwrap_or(Value::Null)),
            Some(input) => Ok(Value::String(input)),
        }
    }

    fn ask_confirm(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        let default = step.default.as_ref().and_then(|v| v.as_bool()).unwrap_or(false);
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            print!("{} {hint}: ", step.label);
            let Some(input) = self.read_line()? else {
                return Ok(Value::Bool(default));
            };
            match input.to_lowercase().as_str() {
                "" => return Ok(Value::Bool(default)),
                "y" | "yes" => return Ok(Value::Bool(true)),
                "n" | "no" => return Ok(Value::Bool(false)),
                _ => println!("Please answer y or n."),
            }
        }
    }

    fn ask_select(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        println!("{}", step.label);
        for (index, choice) in step.choices.iter().enumerate() {
            println!("  {}. {}", index + 1, choice);
        }
        loop {
            match &step.default {
                Some(default) => print!("Choice [{}]: ", display_default(default)),
                None => print!("Choice: "),
            }
            let Some(input) = self.read_line()? else {
                return Self::resolve_eof(step);
            };
            if input.is_empty() {
                if let Some(default) = &step.default {
                    return Ok(default.clone());
                }
            }
            if let Some(choice) = parse_choice(&input, &step.choices) {
                return Ok(Value::String(choice));
            }
            println!("Please pick one of the listed choices.");
        }
    }

    fn ask_multi_select(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        println!("{}", step.label);
        for (index, choice) in step.choices.iter().enumerate() {
            println!("  {}. {}", index + 1, choice);
        }
        loop {
            match &step.default {
                Some(default) => print!("Choices (comma-separated) [{}]: ", display_default(default)),
                None => print!("Choices (comma-separated): "),
            }
            let Some(input) = self.read_line()? else {
                return Ok(step
                    .default
                    .clone()
                    .unwrap_or_else(|| Value::Array(Vec::new())));
            };
            if input.is_empty() {
                return Ok(step
                    .default
                    .clone()
                    .unwrap_or_else(|| Value::Array(Vec::new())));
            }
            if let Some(choices) = parse_multi_choice(&input, &step.choices) {
                return Ok(Value::Array(choices.into_iter().map(Value::String).collect()));
            }
            println!("Please pick from the listed choices.");
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    fn ask(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        match step.kind {
            PromptKind::Text => self.ask_text(step),
            PromptKind::Confirm => self.ask_confirm(step),
            PromptKind::Select => self.ask_select(step),
            PromptKind::MultiSelect => self.ask_multi_select(step),
        }
    }
}

/// Non-interactive prompt: every step resolves to its declared default
///
/// Steps without a default resolve to `Value::Null` so a defaults-only
/// run stays total.
#[derive(Debug, Default)]
pub struct DefaultsPrompt {
    _private: (),
}

impl DefaultsPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Prompt for DefaultsPrompt {
    fn ask(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        Ok(step.default.clone().unwrap_or(Value::Null))
    }
}

/// Scripted prompt for tests: answers are consumed in order
///
/// When the script is exhausted the step's default is used, so a test
/// only needs to script the answers it cares about. Asked step keys are
/// recorded so tests can assert that skipped steps never prompted.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Value>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Value>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Keys of the steps that actually prompted, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, step: &PromptStep) -> Result<Value, TermflowError> {
        self.asked.push(step.key.clone());
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => Ok(step.default.clone().unwrap_or(Value::Null)),
        }
    }
}

/// Resolve a selection answer: 1-based index or exact choice text
fn parse_choice(input: &str, choices: &[String]) -> Option<String> {
    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= choices.len() {
            return Some(choices[index - 1].clone());
        }
        return None;
    }
    choices.iter().find(|c| c.as_str() == input).cloned()
}

/// Resolve a comma-separated multi-selection answer
fn parse_multi_choice(input: &str, choices: &[String]) -> Option<Vec<String>> {
    let mut selected = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let choice = parse_choice(part, choices)?;
        if !selected.contains(&choice) {
            selected.push(choice);
        }
    }
    if selected.is_empty() {
        return None;
    }
    Some(selected)
}

fn display_default(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
