//! `formcraft backup` and `formcraft stats`.

use anyhow::Result;
use console::style;

use crate::cli::spinner;
use crate::state::AppState;

pub async fn create_backup(state: &AppState, json: bool) -> Result<()> {
    let progress = spinner("Creating backup...");
    let receipt = state.backup_service.create_backup().await;
    progress.finish_and_clear();
    let receipt = receipt?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    println!();
    println!("  {} Backup created", style("✓").green().bold());
    println!();
    println!("  Forms:       {}", style(receipt.counts.total_forms).bold());
    println!("  Submissions: {}", style(receipt.counts.total_submissions).bold());
    println!("  Tests:       {}", receipt.counts.test_submissions);
    println!("  File:        {}", style(state.store.root().join(&receipt.path).display()).dim());
    println!("  URL:         {}", style(&receipt.backup_url).yellow());
    println!();

    Ok(())
}

pub async fn show_stats(state: &AppState, json: bool) -> Result<()> {
    let stats = state.backup_service.stats().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Forms ──").dim());
    println!("  Total:        {}", style(stats.forms.total).bold());
    println!("  Last 7 days:  {}", stats.forms.recent);
    for (form_type, count) in &stats.forms.by_type {
        println!("    {} {form_type}: {count}", style("•").dim());
    }
    println!();

    println!("  {}", style("── Submissions ──").dim());
    println!("  Total:        {}", style(stats.submissions.total).bold());
    println!("  Real:         {}", style(stats.submissions.real).green());
    println!("  Tests:        {}", style(stats.submissions.tests).yellow());
    println!("  With files:   {}", stats.submissions.with_files);
    println!("  Last 24h:     {}", stats.submissions.recent);
    println!();

    println!("  {}", style("── Storage ──").dim());
    let connected = if stats.storage.blob_connected {
        style("connected").green()
    } else {
        style("unreachable").red()
    };
    println!("  Blobs:        {connected}");
    println!("  Checked at:   {}", style(stats.storage.checked_at.to_rfc3339()).dim());
    println!();

    Ok(())
}
