//! Formcraft CLI and REST API entry point.
//!
//! Binary name: `formcraft`
//!
//! Parses CLI arguments, loads configuration and wires the services, then
//! dispatches to the appropriate command handler or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use formcraft_observe::tracing_setup::{LogLevel, init_tracing, shutdown_tracing};

use cli::{Cli, Commands, FormsCommand, SubmissionsCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(LogLevel::from_flags(cli.quiet, cli.verbose), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "formcraft", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    tracing::debug!(
        data_dir = %state.data_dir.display(),
        generation = state.generator.is_some(),
        "application state ready"
    );

    match cli.command {
        Commands::Design { specification, save } => {
            cli::design::design_form(&state, &specification, save, cli.json).await?;
        }

        Commands::Forms { action } => match action {
            FormsCommand::List => cli::forms::list_forms(&state, cli.json).await?,
            FormsCommand::Show { id } => cli::forms::show_form(&state, &id, cli.json).await?,
            FormsCommand::Delete { id, force } => {
                cli::forms::delete_form(&state, &id, force, cli.json).await?;
            }
        },

        Commands::Submissions { action } => match action {
            SubmissionsCommand::List { limit } => {
                cli::submissions::list_submissions(&state, limit, cli.json).await?;
            }
        },

        Commands::Backup => cli::backup::create_backup(&state, cli.json).await?,

        Commands::Stats => cli::backup::show_stats(&state, cli.json).await?,

        Commands::Status => cli::status::status(&state, cli.json).await?,

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} Formcraft API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  Embed widget: {}",
                    console::style(format!("{}/api/v1/embed", state.public_url())).yellow()
                );
                if state.generator.is_none() {
                    println!(
                        "  {}",
                        console::style("No Gemini API key: forms and replies use templates").yellow()
                    );
                }
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }
            tracing::info!(%addr, public_url = %state.public_url(), "server starting");

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
