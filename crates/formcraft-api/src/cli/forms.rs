//! `formcraft forms`: list, show and delete saved forms.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use crate::cli::design::print_schema;
use crate::cli::{spinner, truncate};
use crate::state::AppState;

pub async fn list_forms(state: &AppState, json: bool) -> Result<()> {
    let forms = state.form_service.list_forms().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forms)?);
        return Ok(());
    }

    if forms.is_empty() {
        println!();
        println!(
            "  {} No saved forms. Create one with: {}",
            style("i").blue().bold(),
            style("formcraft design \"...\" --save").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Fields").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for form in &forms {
        table.add_row(vec![
            Cell::new(form.id()).fg(Color::DarkGrey),
            Cell::new(truncate(&form.schema.title, 40)).fg(Color::Cyan),
            Cell::new(form.schema.form_type().to_string()),
            Cell::new(form.schema.fields.len()),
            Cell::new(form.created_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} form{}",
        style(forms.len()).bold(),
        if forms.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

pub async fn show_form(state: &AppState, id: &str, json: bool) -> Result<()> {
    let form = state.form_service.get_form(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&form)?);
        return Ok(());
    }

    print_schema(&form.schema);
    println!("  ID:      {}", style(form.id()).dim());
    println!("  Created: {}", form.created_at.to_rfc3339());
    println!(
        "  Embed:   {}",
        style(format!("{}/api/v1/embed?id={}", state.public_url(), form.id())).yellow()
    );
    println!();

    Ok(())
}

pub async fn delete_form(state: &AppState, id: &str, force: bool, json: bool) -> Result<()> {
    let form = state.form_service.get_form(id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete form '{}'? Embedded widgets will fall back to the newest form.",
                style(&form.schema.title).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let progress = spinner(format!("Deleting {}...", form.schema.title));
    let result = state.form_service.delete_form(form.id()).await;
    progress.finish_and_clear();
    result?;

    if json {
        println!("{}", serde_json::json!({ "deleted": true, "id": form.id() }));
    } else {
        println!(
            "  {} Form '{}' deleted.",
            style("✓").red().bold(),
            form.schema.title
        );
    }

    Ok(())
}
