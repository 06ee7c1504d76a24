//! # Help Renderer
//!
//! Pure function of the active command's metadata and the command
//! registry, producing the styled help text. The default command's help
//! enumerates every registered sub-command; a sub-command's help only
//! shows its own options.

use colored::Colorize;

use crate::context::{CommandEntry, Context, DEFAULT_COMMAND_NAME};

/// Everything the renderer needs, snapshotted out of the shared context
#[derive(Debug, Clone)]
pub(crate) struct HelpModel {
    pub program: String,
    /// Active command name; empty for the default command
    pub command: String,
    pub description: String,
    /// Option name → help text, in declaration order
    pub options: Vec<(String, String)>,
    /// Sub-command name → description; only populated for the default command
    pub commands: Vec<(String, String)>,
}

/// Snapshot the help model for one command out of the shared context
///
/// `entry` is the registry entry for `command`; the caller has already
/// resolved it.
pub(crate) fn model_for(ctx: &Context, command: &str, entry: &CommandEntry) -> HelpModel {
    let is_default = command == DEFAULT_COMMAND_NAME;

    let commands = if is_default {
        ctx.commands
            .iter()
            .filter(|(name, _)| name.as_str() != DEFAULT_COMMAND_NAME)
            .map(|(name, entry)| (name.clone(), entry.description.clone()))
            .collect()
    } else {
        Vec::new()
    };

    HelpModel {
        program: ctx.program_name.clone(),
        command: if is_default { String::new() } else { command.to_string() },
        description: entry.description.clone(),
        options: entry
            .option_help
            .iter()
            .map(|(name, help)| (name.clone(), help.clone()))
            .collect(),
        commands,
    }
}

/// Render the help text
pub(crate) fn render(model: &HelpModel) -> String {
    let has_commands = !model.commands.is_empty();
    let has_options = !model.options.is_empty();

    // Label column width across commands and options, for aligned output.
    let padding = model
        .commands
        .iter()
        .chain(model.options.iter())
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();

    out.push_str(&title("Usage"));
    let mut usage = model.program.clone();
    if !model.command.is_empty() {
        usage.push(' ');
        usage.push_str(&model.command);
    }
    let mut usage_line = usage.green().to_string();
    if has_commands {
        usage_line.push_str(" <command>");
    }
    if has_options {
        usage_line.push_str(" [...options]");
    }
    out.push_str(&usage_line);
    out.push('\n');

    out.push_str(&title("Description"));
    out.push_str(&model.description);
    out.push('\n');

    if has_commands {
        out.push_str(&title("Commands"));
        for (name, description) in &model.commands {
            out.push_str(&label_value(name, description, padding));
        }
    }

    if has_options {
        out.push_str(&title("Options"));
        for (name, help) in &model.options {
            out.push_str(&label_value(name, help, padding));
        }
    }

    out
}

fn title(text: &str) -> String {
    format!("\n{}:\n", text.yellow().bold().underline())
}

fn label_value(label: &str, value: &str, padding: usize) -> String {
    let padded = format!("{label:<width$}", width = padding + 1);
    format!("  {} {value}\n", padded.green())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_model() -> HelpModel {
        HelpModel {
            program: "prog".to_string(),
            command: String::new(),
            description: "A demo program".to_string(),
            options: vec![
                ("help".to_string(), "Display help information".to_string()),
                ("version".to_string(), "Display version information".to_string()),
            ],
            commands: vec![("build".to_string(), "Build the project".to_string())],
        }
    }

    #[test]
    fn test_default_command_usage_omits_command_token() {
        colored::control::set_override(false);
        let help = render(&default_model());
        assert!(help.contains("prog <command> [...options]"));
        assert!(!help.contains("__default__"));
    }

    #[test]
    fn test_default_command_lists_subcommands() {
        colored::control::set_override(false);
        let help = render(&default_model());
        assert!(help.contains("Commands:"));
        assert!(help.contains("build"));
        assert!(help.contains("Build the project"));
    }

    #[test]
    fn test_subcommand_usage_includes_command_token() {
        colored::control::set_override(false);
        let mut model = default_model();
        model.command = "build".to_string();
        model.commands.clear();

        let help = render(&model);
        assert!(help.contains("prog build [...options]"));
        assert!(!help.contains("Commands:"));
        assert!(!help.contains("<command>"));
    }

    #[test]
    fn test_labels_align_to_longest_name() {
        colored::control::set_override(false);
        let help = render(&default_model());
        // "version" is the longest listed name; shorter labels are padded
        // to the same column.
        assert!(help.contains("  help     Display help information"));
        assert!(help.contains("  version  Display version information"));
    }

    #[test]
    fn test_default_without_subcommands_has_plain_usage() {
        colored::control::set_override(false);
        let mut model = default_model();
        model.commands.clear();

        let help = render(&model);
        assert!(help.contains("prog [...options]"));
        assert!(!help.contains("<command>"));
    }
}
