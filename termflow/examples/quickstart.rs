//! Interactive walkthrough of the builder surface.
//!
//! Run with no arguments for the prompt chain, `--help` for usage, or
//! `clean --help` for a sub-command's help screen.

use serde_json::json;
use termflow::{OptionStep, Program, StepOutput, TaskStep};

#[tokio::main]
async fn main() {
    termflow::logging::init();

    let program = Program::new(termflow::package_metadata!(), "Termflow quickstart")
        .on_shutdown(|| println!("\nBye!"))
        .option(
            OptionStep::new("question1")
                .label("What is your single choice?")
                .select(["singleOption1", "singleOption2"])
                .default_value(json!("singleOption1")),
        )
        .option(
            OptionStep::new("question2")
                .label("What is your multiple choices?")
                .multi_select(["multipleOption1", "multipleOption2"])
                .default_value(json!(["multipleOption2"]))
                .skip(|values| values.get_str("question1") != Some("singleOption2")),
        )
        .option(
            OptionStep::new("question3")
                .label("What is your confirm input?")
                .confirm()
                .default_value(json!(true)),
        )
        .option(
            OptionStep::new("question4")
                .label("What is your text input?")
                .default_value(json!("bypass next command"))
                .skip(|values| values.get_bool("question3").unwrap_or(false)),
        )
        .task(
            TaskStep::new("gitstatus", |_ctx| async {
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;
                Ok(Some(StepOutput::new("question5", json!(["plop"]))))
            })
            .label("Checking git status")
            .skip(|values| {
                values
                    .get_str("question4")
                    .map_or(true, |answer| answer == "bypass next command")
            }),
        )
        .task(TaskStep::new("summary", |ctx| async move {
            println!("\nCollected values:");
            for (key, value) in ctx.values.iter() {
                println!("  {key} = {value}");
            }
            Ok(None)
        }));

    program.command("clean", "Remove generated artifacts").task(
        TaskStep::new("clean", |_ctx| async {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            Ok(None)
        })
        .label("Cleaning"),
    );

    program.start().await;
}
