//! # Step Manager
//!
//! Executes one command's step list against the shared context, in
//! declaration order. Skip predicates are evaluated lazily immediately
//! before each step, a single task is in flight at a time, and each
//! produced value is merged before the next step runs so later
//! predicates and handlers can see it.
//!
//! The context mutex is never held across an await: traversal snapshots
//! the accumulated values, runs the step, then locks briefly to merge.

use serde_json::Value;
use tracing::debug;

use crate::context::{self, SharedContext};
use crate::error::TermflowError;
use crate::progress::{Spinner, TaskSpinner};
use crate::prompt::Prompt;
use crate::step::{Step, StepKind, TaskContext};

/// Owns the ordered step list of the single active command
pub(crate) struct StepManager {
    steps: Vec<Step>,
}

impl StepManager {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Run every step to completion, stopping at the first task failure
    ///
    /// Values merged before a failure remain in the context; there is no
    /// rollback.
    pub async fn traverse(
        self,
        shared: &SharedContext,
        prompt: &mut dyn Prompt,
    ) -> Result<(), TermflowError> {
        for step in self.steps {
            let (values, options) = {
                let ctx = context::lock(shared);
                (ctx.values.clone(), ctx.options.clone())
            };

            if step.should_skip(&values) {
                debug!(step = %step.key, "step skipped");
                continue;
            }

            match step.kind {
                StepKind::Prompt(prompt_step) => {
                    debug!(step = %step.key, kind = %prompt_step.kind, "prompting");
                    let value = prompt.ask(&prompt_step)?;
                    merge(shared, step.key, value)?;
                }
                StepKind::Task { label, handler } => {
                    debug!(step = %step.key, "task started");
                    let spinner = label.as_deref().map(Spinner::start);
                    let snapshot = TaskContext { values, options };

                    match handler(snapshot).await {
                        Ok(output) => {
                            if let Some(spinner) = spinner {
                                spinner.finish(label.as_deref().unwrap_or(&step.key));
                            }
                            debug!(step = %step.key, "task finished");
                            if let Some(output) = output {
                                merge(shared, output.key, output.value)?;
                            }
                        }
                        Err(source) => {
                            if let Some(spinner) = spinner {
                                spinner.abandon(label.as_deref().unwrap_or(&step.key));
                            }
                            return Err(TermflowError::Task {
                                step: step.key,
                                source,
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

fn merge(shared: &SharedContext, key: String, value: Value) -> Result<(), TermflowError> {
    debug!(step = %key, "value merged");
    context::lock(shared).merge_value(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    use crate::context::{Context, DEFAULT_COMMAND_NAME};
    use crate::prompt::ScriptedPrompt;
    use crate::step::{OptionStep, StepOutput, TaskStep};

    fn shared() -> SharedContext {
        Context::new(
            "prog".to_string(),
            "1.0.0".to_string(),
            DEFAULT_COMMAND_NAME.to_string(),
            IndexMap::new(),
        )
        .into_shared()
    }

    #[tokio::test]
    async fn test_prompt_value_lands_under_step_key() {
        let shared = shared();
        let steps = vec![OptionStep::new("name")
            .label("Name?")
            .default_value(json!("anon"))
            .into_step()];
        let mut prompt = ScriptedPrompt::new([json!("ada")]);

        StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap();

        let ctx = context::lock(&shared);
        assert_eq!(ctx.values.get_str("name"), Some("ada"));
    }

    #[tokio::test]
    async fn test_skipped_step_never_prompts_nor_writes() {
        let shared = shared();
        let steps = vec![
            OptionStep::new("first").default_value(json!("a")).into_step(),
            OptionStep::new("second")
                .default_value(json!("b"))
                .skip(|values| values.contains("first"))
                .into_step(),
        ];
        let mut prompt = ScriptedPrompt::new([]);

        StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap();

        assert_eq!(prompt.asked(), ["first"]);
        let ctx = context::lock(&shared);
        assert!(ctx.values.contains("first"));
        assert!(!ctx.values.contains("second"));
    }

    #[tokio::test]
    async fn test_task_output_visible_to_later_predicate() {
        let shared = shared();
        let steps = vec![
            TaskStep::new("probe", |_ctx| async {
                Ok(Some(StepOutput::new("probe", json!("ok"))))
            })
            .into_step(),
            OptionStep::new("follow_up")
                .default_value(json!("asked"))
                .skip(|values| values.get_str("probe") == Some("ok"))
                .into_step(),
        ];
        let mut prompt = ScriptedPrompt::new([]);

        StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap();

        let ctx = context::lock(&shared);
        assert_eq!(ctx.values.get_str("probe"), Some("ok"));
        assert!(!ctx.values.contains("follow_up"));
    }

    #[tokio::test]
    async fn test_task_failure_stops_traversal_and_keeps_values() {
        let shared = shared();
        let steps = vec![
            TaskStep::new("first", |_ctx| async {
                Ok(Some(StepOutput::new("first", json!(1))))
            })
            .into_step(),
            TaskStep::new("boom", |_ctx| async { Err(anyhow::anyhow!("exploded")) }).into_step(),
            TaskStep::new("never", |_ctx| async {
                Ok(Some(StepOutput::new("never", json!(true))))
            })
            .into_step(),
        ];
        let mut prompt = ScriptedPrompt::new([]);

        let err = StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap_err();

        assert!(matches!(&err, TermflowError::Task { step, .. } if step == "boom"));
        let ctx = context::lock(&shared);
        assert_eq!(ctx.values.get("first"), Some(&json!(1)));
        assert!(!ctx.values.contains("never"));
    }

    #[tokio::test]
    async fn test_task_returning_none_writes_nothing() {
        let shared = shared();
        let steps = vec![TaskStep::new("quiet", |_ctx| async { Ok(None) }).into_step()];
        let mut prompt = ScriptedPrompt::new([]);

        StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap();

        assert!(context::lock(&shared).values.is_empty());
    }

    #[tokio::test]
    async fn test_task_sees_options_snapshot() {
        let mut options = IndexMap::new();
        options.insert("dry-run".to_string(), json!(true));
        let shared = Context::new(
            "prog".to_string(),
            "1.0.0".to_string(),
            DEFAULT_COMMAND_NAME.to_string(),
            options,
        )
        .into_shared();

        let steps = vec![TaskStep::new("check", |ctx: TaskContext| async move {
            let dry = ctx.options.get("dry-run").and_then(|v| v.as_bool());
            Ok(Some(StepOutput::new("check", json!(dry == Some(true)))))
        })
        .into_step()];
        let mut prompt = ScriptedPrompt::new([]);

        StepManager::new(steps)
            .traverse(&shared, &mut prompt)
            .await
            .unwrap();

        assert_eq!(context::lock(&shared).values.get_bool("check"), Some(true));
    }
}
