//! # Command Activation
//!
//! Two-phase protocol: every command registers its metadata and steps
//! during the synchronous builder phase; the resolve below then runs
//! once over the complete registry. At most one command activates, the
//! one whose name matches the invocation; every other command stays
//! inert beyond its registry entry.

use std::mem;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::{self, SharedContext};
use crate::error::TermflowError;
use crate::help;
use crate::manager::StepManager;
use crate::prompt::Prompt;

/// What the active command does, decided once from the parsed options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivationMode {
    /// Render help and stop; user steps never run
    Help,
    /// Render the version and stop
    Version,
    /// Traverse the step list
    Run,
}

impl ActivationMode {
    pub fn from_options(options: &IndexMap<String, Value>) -> Self {
        if options.contains_key("help") {
            ActivationMode::Help
        } else if options.contains_key("version") {
            ActivationMode::Version
        } else {
            ActivationMode::Run
        }
    }
}

/// Resolve the registry against the invoked command and run the match
///
/// An invocation naming no registered command is a silent no-op apart
/// from a warning: nothing traverses, nothing renders, and no error is
/// returned.
pub(crate) async fn activate(
    shared: &SharedContext,
    prompt: &mut dyn Prompt,
) -> Result<(), TermflowError> {
    let resolved = {
        let mut ctx = context::lock(shared);
        let ctx = &mut *ctx;
        let current = ctx.current_command.clone();

        let Some(entry) = ctx.commands.get(&current) else {
            warn!(command = %current, "invoked command is not registered");
            return Ok(());
        };

        let mode = ActivationMode::from_options(&ctx.options);
        debug!(command = %current, ?mode, "command activated");

        match mode {
            ActivationMode::Help => {
                Resolved::Print(help::render(&help::model_for(ctx, &current, entry)))
            }
            ActivationMode::Version => {
                Resolved::Print(format!("{} {}", ctx.program_name, ctx.version))
            }
            // The entry's presence was just checked, so indexing holds.
            ActivationMode::Run => Resolved::Traverse(mem::take(&mut ctx.commands[&current].steps)),
        }
    };

    match resolved {
        Resolved::Print(text) => {
            println!("{text}");
            Ok(())
        }
        Resolved::Traverse(steps) => StepManager::new(steps).traverse(shared, prompt).await,
    }
}

/// Outcome of the locked resolve section, executed after the lock drops
enum Resolved {
    Print(String),
    Traverse(Vec<crate::step::Step>),
}
