//! System status command.

use anyhow::Result;
use console::style;

use formcraft_types::llm::BreakerState;

use crate::state::AppState;

/// Configuration, credential and circuit breaker overview.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let breaker = state.breaker.status();
    let forms = state.form_service.list_forms().await.map(|f| f.len()).unwrap_or(0);
    let key_configured = state.config.gemini.usable_api_key().is_some();

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "public_url": state.public_url(),
            "gemini": {
                "model": state.config.gemini.model,
                "api_key_configured": key_configured,
            },
            "breaker": breaker,
            "forms": forms,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} Formcraft v{}", style("⚡").bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Gemini ──").dim());
    println!("  Model:   {}", style(&state.config.gemini.model).cyan());
    if key_configured {
        println!("  API key: {}", style("configured").green());
    } else {
        println!(
            "  API key: {} (forms use templates, replies use canned text)",
            style("missing").yellow()
        );
    }
    println!();

    println!("  {}", style("── Circuit breaker ──").dim());
    let state_label = match breaker.state {
        BreakerState::Closed => style("closed").green(),
        BreakerState::Open => style("open").red(),
    };
    println!("  State:    {state_label}");
    println!(
        "  Failures: {}/{}",
        breaker.consecutive_failures, breaker.failure_threshold
    );
    if let Some(secs) = breaker.last_failure_secs_ago {
        println!("  Last failure: {}", style(format!("{secs}s ago")).dim());
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:   {}", style(state.data_dir.display()).dim());
    println!("  Public URL: {}", style(state.public_url()).dim());
    println!("  Forms:      {}", style(forms).bold());
    println!();

    Ok(())
}
