//! # Program Entry & Fluent Interface
//!
//! The [`Program`] factory parses the argument vector once, builds the
//! single shared context, and acts as the builder for the default
//! command. Sub-commands are independent [`CommandBuilder`] handles over
//! the same context, so a chain of `.command()` calls registers every
//! command before [`Program::run`] resolves which one activates.

use std::io::IsTerminal;
use std::sync::Arc;

use crate::command;
use crate::context::{self, Context, SharedContext, DEFAULT_COMMAND_NAME};
use crate::error::{self, TermflowError};
use crate::lifecycle::{self, ExceptionFn, ShutdownFn};
use crate::package::PackageMetadata;
use crate::parser;
use crate::prompt::{DefaultsPrompt, Prompt, StdinPrompt};
use crate::step::{OptionStep, TaskStep};
use crate::StepValues;

/// Root builder for a terminal program
///
/// Doubles as the default command: steps declared directly on the
/// program run when the invocation names no sub-command.
///
/// Options use the `--key=value` form. The space-separated
/// `--key value` form is only recognized after a sub-command name:
/// before one, a flag is always bare, so `prog --name=foo` sets the
/// option while `prog --name foo` would read `foo` as a command name.
///
/// ```no_run
/// use termflow::{OptionStep, Program, TaskStep};
/// use serde_json::json;
///
/// # async fn demo() -> Result<(), termflow::TermflowError> {
/// let program = Program::new(termflow::package_metadata!(), "A demo program")
///     .option(
///         OptionStep::new("color")
///             .label("Pick a color")
///             .select(["red", "green"])
///             .default_value(json!("red")),
///     )
///     .task(TaskStep::new("report", |ctx| async move {
///         println!("color = {:?}", ctx.values.get_str("color"));
///         Ok(None)
///     }));
///
/// program.command("clean", "Remove build artifacts");
///
/// program.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct Program {
    shared: SharedContext,
    prompt: Option<Box<dyn Prompt>>,
    on_shutdown: Option<ShutdownFn>,
    on_exception: Option<ExceptionFn>,
}

impl Program {
    /// Create a program from explicit metadata and a description
    ///
    /// Parses the process argument vector once; the resulting command
    /// name and options are fixed for the whole invocation.
    pub fn new(metadata: PackageMetadata, description: impl Into<String>) -> Self {
        Self::with_arguments(metadata, description, std::env::args().skip(1))
    }

    /// Create a program from a bare description string
    ///
    /// Package metadata is detected from the running executable.
    pub fn from_description(description: impl Into<String>) -> Self {
        Self::new(PackageMetadata::from_executable(), description)
    }

    /// Create a program over an explicit argument vector
    ///
    /// `arguments` must not include the program name token. This is the
    /// seam used by the integration tests; `Program::new` is the normal
    /// entry point.
    pub fn with_arguments<I>(
        metadata: PackageMetadata,
        description: impl Into<String>,
        arguments: I,
    ) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let parsed = parser::parse_arguments(arguments);
        let mut ctx = Context::new(metadata.name, metadata.version, parsed.command, parsed.options);
        ctx.register_command(DEFAULT_COMMAND_NAME, description.into());

        Self {
            shared: ctx.into_shared(),
            prompt: None,
            on_shutdown: None,
            on_exception: None,
        }
    }

    /// Callback invoked before a graceful, signal-triggered exit
    pub fn on_shutdown<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_shutdown = Some(Arc::new(callback));
        self
    }

    /// Callback invoked before an exceptional exit from [`Program::start`]
    pub fn on_exception<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TermflowError) + Send + Sync + 'static,
    {
        self.on_exception = Some(Box::new(callback));
        self
    }

    /// Replace the prompt collaborator
    ///
    /// Defaults to [`StdinPrompt`] on a terminal and [`DefaultsPrompt`]
    /// otherwise.
    pub fn with_prompt(mut self, prompt: impl Prompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    /// Declare a prompt step on the default command
    pub fn option(self, step: OptionStep) -> Self {
        context::lock(&self.shared).declare_step(DEFAULT_COMMAND_NAME, step.into_step());
        self
    }

    /// Declare a task step on the default command
    pub fn task(self, step: TaskStep) -> Self {
        context::lock(&self.shared).declare_step(DEFAULT_COMMAND_NAME, step.into_step());
        self
    }

    /// Attach a new sub-command sharing this program's context
    ///
    /// The returned builder is independent: declaring steps on it never
    /// touches the default command, but its name and description are
    /// visible to the default command's help screen.
    pub fn command(&self, name: impl Into<String>, description: impl Into<String>) -> CommandBuilder {
        let name = name.into();
        context::lock(&self.shared).register_command(&name, description.into());
        CommandBuilder {
            shared: Arc::clone(&self.shared),
            name,
        }
    }

    /// Names of every registered command, in declaration order
    ///
    /// The default command is excluded; it is always present.
    pub fn command_names(&self) -> Vec<String> {
        context::lock(&self.shared).subcommand_names()
    }

    /// Resolve the registry and run the active command
    ///
    /// Returns the values accumulated by the traversal. Help and version
    /// invocations render and return an empty value set, as does an
    /// invocation naming an unregistered command (logged as a warning,
    /// never an error).
    pub async fn run(self) -> Result<StepValues, TermflowError> {
        lifecycle::install_signal_handlers(
            self.on_shutdown.unwrap_or_else(|| Arc::new(|| {})),
        );

        let mut prompt = self.prompt.unwrap_or_else(default_prompt);
        command::activate(&self.shared, prompt.as_mut()).await?;

        Ok(context::lock(&self.shared).values.clone())
    }

    /// Run with process-level exit semantics
    ///
    /// A traversal failure prints the error, invokes the exception
    /// callback, and exits with status 1.
    pub async fn start(mut self) {
        let on_exception = self.on_exception.take();
        if let Err(err) = self.run().await {
            error::print_error(&err);
            if let Some(callback) = on_exception {
                callback(&err);
            }
            std::process::exit(1);
        }
    }
}

/// Builder for one sub-command, sharing the program's context
pub struct CommandBuilder {
    shared: SharedContext,
    name: String,
}

impl CommandBuilder {
    /// Declare a prompt step on this command
    pub fn option(self, step: OptionStep) -> Self {
        context::lock(&self.shared).declare_step(&self.name, step.into_step());
        self
    }

    /// Declare a task step on this command
    pub fn task(self, step: TaskStep) -> Self {
        context::lock(&self.shared).declare_step(&self.name, step.into_step());
        self
    }

    /// This command's name
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn default_prompt() -> Box<dyn Prompt> {
    if std::io::stdin().is_terminal() {
        Box::new(StdinPrompt::new())
    } else {
        Box::new(DefaultsPrompt::new())
    }
}
