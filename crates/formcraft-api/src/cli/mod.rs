//! CLI command definitions and dispatch for the `formcraft` binary.
//!
//! Uses clap derive macros for argument parsing. Every command works
//! directly against the local data directory; `serve` exposes the same
//! services over HTTP.

pub mod backup;
pub mod design;
pub mod forms;
pub mod status;
pub mod submissions;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Generate, embed and collect web forms.
#[derive(Parser)]
#[command(name = "formcraft", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server and embed widget.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate a form from a natural-language description.
    Design {
        /// What the form is for, e.g. "Expédier un colis d'Abidjan vers Paris".
        specification: String,

        /// Save the generated form and print its embed URL.
        #[arg(long)]
        save: bool,
    },

    /// Manage saved forms.
    Forms {
        #[command(subcommand)]
        action: FormsCommand,
    },

    /// Browse collected submissions.
    Submissions {
        #[command(subcommand)]
        action: SubmissionsCommand,
    },

    /// Snapshot every form and submission to a backup blob.
    Backup,

    /// Form and submission statistics.
    Stats,

    /// Configuration and circuit breaker status.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FormsCommand {
    /// List saved forms, newest first.
    #[command(alias = "ls")]
    List,

    /// Show one form with its fields.
    Show {
        /// Form id (or generation id).
        id: String,
    },

    /// Delete a saved form.
    #[command(alias = "rm")]
    Delete {
        /// Form id (or generation id).
        id: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SubmissionsCommand {
    /// List recent submissions, newest first.
    #[command(alias = "ls")]
    List {
        /// Maximum number of submissions to show.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

/// Steady-ticking spinner for a long-running step.
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Truncate to `max` characters with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_design() {
        let cli = Cli::parse_from(["formcraft", "design", "Réservation de table", "--save", "-v"]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Design { specification, save } => {
                assert_eq!(specification, "Réservation de table");
                assert!(save);
            }
            _ => panic!("expected design command"),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("court", 10), "court");
        assert_eq!(truncate("Expédition de colis", 10), "Expédit...");
    }
}
