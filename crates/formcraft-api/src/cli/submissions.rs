//! `formcraft submissions`: browse collected submissions.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use formcraft_types::submission::Submission;

use crate::cli::truncate;
use crate::state::AppState;

pub async fn list_submissions(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let summary = state.submission_service.summary(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.submissions.is_empty() {
        println!();
        println!("  {} No submissions yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Received").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Contact").fg(Color::White),
        Cell::new("Message").fg(Color::White),
        Cell::new("Source").fg(Color::White),
    ]);

    for submission in &summary.submissions {
        table.add_row(vec![
            Cell::new(submission.timestamp.format("%Y-%m-%d %H:%M").to_string())
                .fg(Color::DarkGrey),
            Cell::new(submission.form_type.to_string()).fg(Color::Cyan),
            Cell::new(contact_label(submission)),
            Cell::new(truncate(submission.normalized.message.as_deref().unwrap_or(""), 50)),
            source_cell(submission),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} total, {} real, {} test, {} embedded",
        style(summary.total).bold(),
        style(summary.real).green(),
        style(summary.tests).yellow(),
        style(summary.embedded).cyan()
    );
    println!();

    Ok(())
}

fn contact_label(submission: &Submission) -> String {
    let contact = &submission.normalized;
    match (contact.name.as_deref(), contact.email.as_deref()) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (Some(value), None) | (None, Some(value)) => value.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn source_cell(submission: &Submission) -> Cell {
    if submission.is_test {
        return Cell::new("test").fg(Color::Yellow);
    }
    match submission.embed.as_ref().and_then(|e| e.domain.as_deref()) {
        Some(domain) => Cell::new(domain).fg(Color::Cyan),
        None if submission.is_embedded() => Cell::new("embed").fg(Color::Cyan),
        None => Cell::new("direct").fg(Color::DarkGrey),
    }
}
