//! Standalone HTML widget served by `GET /api/v1/embed`.
//!
//! The page renders one form schema and posts it as multipart form data to
//! `/api/v1/collect`, tagged with the hidden embed control fields. Every
//! schema-derived string is escaped for its context (HTML text, attribute or
//! JavaScript literal).

use formcraft_core::service::forms::DEFAULT_EMBED_ID;
use formcraft_types::form::{FieldType, FormField, FormSchema};

const DEFAULT_WIDTH: &str = "400px";
const DEFAULT_HEIGHT: &str = "auto";
const DEFAULT_SELECT_OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(t) if t.eq_ignore_ascii_case("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn background(self) -> &'static str {
        match self {
            Theme::Light => "rgba(255, 255, 255, 0.95)",
            Theme::Dark => "rgba(15, 23, 42, 0.95)",
        }
    }

    fn border(self) -> &'static str {
        match self {
            Theme::Light => "rgba(0, 0, 0, 0.1)",
            Theme::Dark => "rgba(255, 255, 255, 0.1)",
        }
    }

    fn text(self) -> &'static str {
        match self {
            Theme::Light => "#1e293b",
            Theme::Dark => "#f1f5f9",
        }
    }

    fn input(self) -> &'static str {
        match self {
            Theme::Light => "rgba(0, 0, 0, 0.05)",
            Theme::Dark => "rgba(255, 255, 255, 0.05)",
        }
    }
}

/// Rendering options taken from the query string.
#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub form_id: String,
    pub theme: Theme,
    pub width: String,
    pub height: String,
    /// Base URL the widget posts to.
    pub api_base: String,
}

impl WidgetOptions {
    pub fn new(
        form_id: Option<&str>,
        theme: Option<&str>,
        width: Option<&str>,
        height: Option<&str>,
        api_base: &str,
    ) -> Self {
        Self {
            form_id: form_id
                .filter(|id| !id.is_empty())
                .unwrap_or(DEFAULT_EMBED_ID)
                .to_string(),
            theme: Theme::from_param(theme),
            width: css_length(width, DEFAULT_WIDTH),
            height: css_length(height, DEFAULT_HEIGHT),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }
}

/// Accept simple CSS lengths (`400px`, `100%`, `auto`); anything else gets
/// the default.
fn css_length(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v)
            if !v.is_empty()
                && v.len() <= 16
                && v.chars().all(|c| c.is_ascii_alphanumeric() || c == '%' || c == '.') =>
        {
            v.to_string()
        }
        _ => default.to_string(),
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// JavaScript string literal, safe inside a `<script>` element.
fn js_string(input: &str) -> String {
    serde_json::to_string(input)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// `nom_complet` -> `Nom Complet`.
fn field_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_field(field: &FormField) -> String {
    let name = escape_html(&field.name);
    let id = format!("field-{name}");
    let placeholder = escape_html(&field.placeholder);
    let required = if field.required { " required" } else { "" };
    let marker = if field.required {
        r#" <span style="color: #ef4444;">*</span>"#
    } else {
        ""
    };
    let label = format!(
        r#"<label class="fc-label" for="{id}">{}{marker}</label>"#,
        escape_html(&field_label(&field.name))
    );

    let control = match field.field_type {
        FieldType::Textarea => format!(
            r#"<textarea id="{id}" name="{name}" class="fc-textarea" rows="4" placeholder="{placeholder}"{required}></textarea>"#
        ),
        FieldType::Select => {
            let options: Vec<String> = match &field.options {
                Some(options) if !options.is_empty() => options.clone(),
                _ => DEFAULT_SELECT_OPTIONS.iter().map(|o| o.to_string()).collect(),
            };
            let options_html: String = options
                .iter()
                .map(|o| {
                    let o = escape_html(o);
                    format!(r#"<option value="{o}">{o}</option>"#)
                })
                .collect();
            format!(
                r#"<select id="{id}" name="{name}" class="fc-input"{required}><option value="">{placeholder}</option>{options_html}</select>"#
            )
        }
        FieldType::File => format!(
            r#"<input id="{id}" type="file" name="{name}" class="fc-input" accept=".pdf,.png,.jpg,.jpeg"{required} />
            <small style="color: #64748b; font-size: 12px;">PDF, PNG ou JPG uniquement</small>"#
        ),
        other => format!(
            r#"<input id="{id}" type="{other}" name="{name}" class="fc-input" placeholder="{placeholder}"{required} />"#
        ),
    };

    format!("<div class=\"fc-field\">\n  {label}\n  {control}\n</div>")
}

/// Render the complete widget page.
pub fn render_widget(schema: &FormSchema, options: &WidgetOptions) -> String {
    let theme = options.theme;
    let title = escape_html(&schema.title);
    let description = if schema.description.is_empty() {
        String::new()
    } else {
        format!(
            r#"<p class="fc-description">{}</p>"#,
            escape_html(&schema.description)
        )
    };
    let fields: String = schema.fields.iter().map(render_field).collect::<Vec<_>>().join("\n");
    let cta = escape_html(&schema.metadata.cta);
    let dom_id = escape_html(&options.form_id);

    let form_id_js = js_string(&options.form_id);
    let api_base_js = js_string(&options.api_base);
    let form_type_js = js_string(schema.form_type().as_str());

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Formcraft - {title}</title>
<style>
  * {{ margin: 0; padding: 0; box-sizing: border-box; }}
  body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: transparent; }}
  .fc-widget {{ width: {width}; height: {height}; max-width: 100%; padding: 24px; border-radius: 20px;
    background: {background}; border: 1px solid {border}; color: {text}; box-shadow: 0 8px 32px rgba(0, 0, 0, 0.1); }}
  .fc-title {{ font-size: 20px; font-weight: bold; margin-bottom: 8px; color: #6366f1; }}
  .fc-description {{ font-size: 13px; margin-bottom: 16px; opacity: 0.8; }}
  .fc-field {{ margin-bottom: 16px; }}
  .fc-label {{ display: block; margin-bottom: 6px; font-weight: 500; font-size: 14px; }}
  .fc-input, .fc-textarea {{ width: 100%; padding: 12px; border: none; border-radius: 12px; background: {input};
    font-size: 14px; color: inherit; font-family: inherit; }}
  .fc-textarea {{ resize: vertical; min-height: 80px; }}
  .fc-button {{ width: 100%; padding: 12px 24px; border: none; border-radius: 12px; cursor: pointer;
    background: linear-gradient(135deg, #6366f1, #8b5cf6); color: white; font-weight: 600; font-size: 14px; }}
  .fc-button:disabled {{ opacity: 0.6; cursor: not-allowed; }}
  .fc-response {{ margin-top: 16px; padding: 12px; border-radius: 12px; font-size: 14px; line-height: 1.4; }}
  .fc-success {{ background: rgba(34, 197, 94, 0.1); border: 1px solid rgba(34, 197, 94, 0.2); color: #059669; }}
  .fc-error {{ background: rgba(239, 68, 68, 0.1); border: 1px solid rgba(239, 68, 68, 0.2); color: #dc2626; }}
  @media (max-width: 480px) {{ .fc-widget {{ padding: 16px; border-radius: 16px; }} }}
</style>
</head>
<body>
<div class="fc-widget" id="formcraft-form-{dom_id}">
  <div class="fc-title">{title}</div>
  {description}
  <form id="formcraft-form">
{fields}
    <button type="submit" class="fc-button" id="submit-btn">{cta}</button>
  </form>
  <div id="response-area"></div>
</div>
<script>
  const FORM_ID = {form_id_js};
  const API_BASE = {api_base_js};
  const FORM_TYPE = {form_type_js};

  function showResponse(kind, text) {{
    const area = document.getElementById('response-area');
    area.innerHTML = '';
    const box = document.createElement('div');
    box.className = 'fc-response ' + kind;
    box.textContent = text;
    area.appendChild(box);
  }}

  document.getElementById('formcraft-form').addEventListener('submit', async function (event) {{
    event.preventDefault();
    const form = event.target;
    const button = document.getElementById('submit-btn');
    const label = button.textContent;
    const data = new FormData(form);
    data.append('_formId', FORM_ID);
    data.append('_embedded', 'true');
    data.append('_embedUrl', window.location.href);
    data.append('_embedDomain', window.location.hostname);
    data.append('_formType', FORM_TYPE);

    button.disabled = true;
    button.textContent = 'Envoi en cours...';
    try {{
      const response = await fetch(API_BASE + '/api/v1/collect', {{ method: 'POST', body: data }});
      const body = await response.json();
      if (response.ok && body.data) {{
        showResponse('fc-success', body.data.message);
        form.reset();
      }} else {{
        const error = body.errors && body.errors[0];
        showResponse('fc-error', error ? error.message : 'Erreur lors de l\'envoi');
      }}
    }} catch (e) {{
      showResponse('fc-error', 'Erreur de connexion. Veuillez réessayer.');
    }} finally {{
      button.disabled = false;
      button.textContent = label;
    }}
  }});
</script>
</body>
</html>
"#,
        width = options.width,
        height = options.height,
        background = theme.background(),
        border = theme.border(),
        text = theme.text(),
        input = theme.input(),
    )
}

#[cfg(test)]
mod tests {
    use formcraft_core::designer::templates::{quick_contact, template_for};
    use formcraft_types::form::FormType;

    use super::*;

    fn options() -> WidgetOptions {
        WidgetOptions::new(Some("0192-abc"), Some("dark"), None, Some("600px"), "http://localhost:3000/")
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_widget_renders_fields_and_control_data() {
        let html = render_widget(&template_for(FormType::Devis), &options());
        assert!(html.contains("Demande de Devis"));
        assert!(html.contains(r#"name="budget""#));
        assert!(html.contains(r#"<option value="&lt; 1000€">"#));
        assert!(html.contains(r#"<textarea id="field-projet""#));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"const FORM_ID = "0192-abc";"#));
        assert!(html.contains(r#"const API_BASE = "http://localhost:3000";"#));
        assert!(html.contains(r#"const FORM_TYPE = "devis";"#));
        assert!(html.contains("/api/v1/collect"));
        assert!(html.contains("rgba(15, 23, 42, 0.95)"));
        assert!(html.contains("width: 400px; height: 600px;"));
        assert!(html.contains(">Demander un Devis</button>"));
    }

    #[test]
    fn test_schema_strings_are_escaped() {
        let mut schema = quick_contact();
        schema.title = "<img src=x onerror=alert(1)>".to_string();
        schema.fields[0].placeholder = "\"><script>".to_string();
        let options = WidgetOptions::new(
            Some("</script><script>alert(1)</script>"),
            None,
            Some("100px;background:url(x)"),
            None,
            "http://localhost:3000",
        );

        let html = render_widget(&schema, &options);
        assert!(!html.contains("<img src=x"));
        assert!(!html.contains("\"><script>"));
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("width: 400px;"));
    }

    #[test]
    fn test_field_label() {
        assert_eq!(field_label("nom_complet"), "Nom Complet");
        assert_eq!(field_label("email"), "Email");
        assert_eq!(field_label("date__reservation"), "Date Reservation");
    }

    #[test]
    fn test_options_defaults() {
        let options = WidgetOptions::new(None, Some("neon"), Some(""), None, "https://x.example");
        assert_eq!(options.form_id, "default");
        assert_eq!(options.theme, Theme::Light);
        assert_eq!(options.width, "400px");
        assert_eq!(options.height, "auto");
    }
}
