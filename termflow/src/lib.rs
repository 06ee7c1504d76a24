//! # Termflow
//!
//! Fluent builder for sequential terminal programs.
//!
//! A program is a set of commands; each command is an ordered list of
//! steps. A step is either a prompt (select, multi-select, confirm or
//! free text) or an asynchronous task, and may be conditionally skipped
//! based on the values produced by earlier steps. All commands share one
//! context: the invoked command name, the parsed options, the
//! accumulated step values, and the registry used for help rendering.
//!
//! Commands register during the synchronous builder phase; `run()` then
//! resolves which single command activates and traverses its steps in
//! declaration order. `--help` and `--version` are built in for every
//! command.
//!
//! ```no_run
//! use serde_json::json;
//! use termflow::{OptionStep, Program, StepOutput, TaskStep};
//!
//! #[tokio::main]
//! async fn main() {
//!     let program = Program::new(termflow::package_metadata!(), "A demo program")
//!         .option(
//!             OptionStep::new("confirmed")
//!                 .label("Proceed?")
//!                 .confirm()
//!                 .default_value(json!(true)),
//!         )
//!         .task(
//!             TaskStep::new("report", |_ctx| async move {
//!                 Ok(Some(StepOutput::new("report", json!("done"))))
//!             })
//!             .label("Reporting")
//!             .skip(|values| values.get_bool("confirmed") != Some(true)),
//!         );
//!
//!     program.start().await;
//! }
//! ```

mod command;
mod context;
mod error;
mod help;
mod lifecycle;
mod manager;
mod package;
mod parser;
mod program;
mod progress;
mod prompt;
mod step;

pub mod logging;

pub use context::StepValues;
pub use error::{format_error, print_error, TermflowError};
pub use package::PackageMetadata;
pub use program::{CommandBuilder, Program};
pub use prompt::{DefaultsPrompt, Prompt, ScriptedPrompt, StdinPrompt};
pub use step::{
    OptionStep, PromptKind, PromptStep, SkipFn, StepOutput, TaskContext, TaskFn, TaskFuture,
    TaskStep,
};
