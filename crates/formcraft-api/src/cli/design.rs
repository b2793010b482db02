//! `formcraft design`: generate (and optionally save) a form.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use formcraft_types::form::{FormSchema, GenerationMethod};

use crate::cli::spinner;
use crate::state::AppState;

pub async fn design_form(state: &AppState, specification: &str, save: bool, json: bool) -> Result<()> {
    let progress = spinner(if state.designer.has_generator() {
        "Génération du formulaire avec Gemini..."
    } else {
        "Génération du formulaire (modèles)..."
    });

    let schema = state.designer.design(specification).await;
    progress.finish_and_clear();
    let schema = schema?;

    let saved = if save {
        Some(state.form_service.save_form(schema.clone()).await?)
    } else {
        None
    };

    if json {
        match &saved {
            Some(form) => println!("{}", serde_json::to_string_pretty(form)?),
            None => println!("{}", serde_json::to_string_pretty(&schema)?),
        }
        return Ok(());
    }

    print_schema(&schema);

    if let Some(form) = saved {
        println!(
            "  {} Saved as {}",
            style("✓").green().bold(),
            style(form.id()).cyan()
        );
        println!(
            "  Embed: {}",
            style(format!("{}/api/v1/embed?id={}", state.public_url(), form.id())).yellow()
        );
        println!();
    }

    Ok(())
}

/// Styled rendering of a schema: header, metadata and a field table.
pub(crate) fn print_schema(schema: &FormSchema) {
    let metadata = &schema.metadata;

    println!();
    println!("  {}", style(&schema.title).bold().cyan());
    if !schema.description.is_empty() {
        println!("  {}", style(&schema.description).dim());
    }
    println!();

    let method = match metadata.method {
        Some(method @ GenerationMethod::AiGenerated) => style(method.to_string()).green(),
        Some(method) => style(method.to_string()).yellow(),
        None => style("-".to_string()).dim(),
    };
    println!("  Type:   {}", style(metadata.form_type).bold());
    println!("  Method: {method}");
    if let Some(reason) = metadata.error_type {
        println!("  Reason: {}", style(reason).yellow());
    }
    if let Some(error) = &metadata.ai_error {
        println!("  Error:  {}", style(error).dim());
    }
    println!("  CTA:    {}", metadata.cta);
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Field").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Required").fg(Color::White),
        Cell::new("Placeholder").fg(Color::White),
    ]);

    for field in &schema.fields {
        let required = if field.required {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::DarkGrey)
        };
        let placeholder = match &field.options {
            Some(options) if !options.is_empty() => options.join(" | "),
            _ => field.placeholder.clone(),
        };
        table.add_row(vec![
            Cell::new(&field.name).fg(Color::Cyan),
            Cell::new(field.field_type.to_string()),
            required,
            Cell::new(placeholder),
        ]);
    }

    println!("{table}");
    println!();
}
