//! Canned form templates and call-to-action defaults.

use formcraft_types::form::{FieldType, FormField, FormMetadata, FormSchema, FormType};

/// Characters of the specification quoted in a fallback description.
const SPECIFICATION_EXCERPT_CHARS: usize = 100;

/// Default call-to-action labels (primary, optional secondary) for a tag.
pub fn default_cta(form_type: FormType) -> (&'static str, Option<&'static str>) {
    match form_type {
        FormType::Expedition => ("Demander un Devis", Some("Réserver l'Expédition")),
        FormType::Contact => ("Envoyer le Message", None),
        FormType::Devis => ("Demander un Devis", None),
        FormType::Restaurant => ("Réserver la Table", None),
        _ => ("Envoyer", None),
    }
}

/// Canned form for a tag. Tags without a dedicated template get the contact form.
pub fn template_for(form_type: FormType) -> FormSchema {
    match form_type {
        FormType::Expedition => expedition(),
        FormType::Devis => devis(),
        FormType::Restaurant => restaurant(),
        _ => contact(),
    }
}

/// Adapt a template to the wording of the specification.
pub fn customize(mut schema: FormSchema, specification: &str) -> FormSchema {
    let lowered = specification.to_lowercase();

    if lowered.contains("urgent") {
        schema.description.push_str(" - Traitement prioritaire");
    }

    if lowered.contains("professionnel") {
        for field in schema.fields.iter_mut().filter(|f| f.name == "entreprise") {
            field.required = true;
        }
    }

    let excerpt: String = specification.chars().take(SPECIFICATION_EXCERPT_CHARS).collect();
    let ellipsis = if specification.chars().count() > SPECIFICATION_EXCERPT_CHARS {
        "..."
    } else {
        ""
    };
    schema.description = format!(
        "{} - Basé sur: \"{excerpt}{ellipsis}\"",
        schema.description
    );
    schema
}

/// Small form served by the embed widget when no saved form matches.
pub fn quick_contact() -> FormSchema {
    FormSchema {
        id: None,
        title: "Formulaire de Contact Rapide".to_string(),
        description: String::new(),
        fields: vec![
            FormField::new("nom", FieldType::Text, "Votre nom complet", true),
            FormField::new("email", FieldType::Email, "votre@email.com", true),
            FormField::new("message", FieldType::Textarea, "Votre message...", true),
        ],
        metadata: FormMetadata::new(FormType::Custom, "Envoyer"),
    }
}

fn schema(form_type: FormType, title: &str, description: &str, fields: Vec<FormField>) -> FormSchema {
    let (cta, _) = default_cta(form_type);
    FormSchema {
        id: None,
        title: title.to_string(),
        description: description.to_string(),
        fields,
        metadata: FormMetadata::new(form_type, cta),
    }
}

fn expedition() -> FormSchema {
    schema(
        FormType::Expedition,
        "Formulaire d'Expédition de Colis",
        "Expédiez vos colis d'Abidjan vers Paris - Devis gratuit",
        vec![
            FormField::new("origine", FieldType::Text, "Ville d'origine (Abidjan)", true),
            FormField::new("destination", FieldType::Text, "Ville de destination (Paris)", true),
            FormField::new("poids", FieldType::Number, "Poids du colis en kg", true),
            FormField::new("nom_expediteur", FieldType::Text, "Nom de l'expéditeur", true),
            FormField::new("tel_expediteur", FieldType::Tel, "Téléphone de l'expéditeur", true),
            FormField::new("nom_destinataire", FieldType::Text, "Nom du destinataire", true),
            FormField::new("tel_destinataire", FieldType::Tel, "Téléphone du destinataire", true),
            FormField::new("message", FieldType::Textarea, "Message à envoyer", false),
        ],
    )
}

fn contact() -> FormSchema {
    schema(
        FormType::Contact,
        "Formulaire de Contact",
        "Contactez-nous facilement",
        vec![
            FormField::new("nom", FieldType::Text, "Votre nom complet", true),
            FormField::new("email", FieldType::Email, "votre@email.com", true),
            FormField::new("telephone", FieldType::Tel, "Votre téléphone", false),
            FormField::new("message", FieldType::Textarea, "Votre message...", true),
        ],
    )
}

fn devis() -> FormSchema {
    schema(
        FormType::Devis,
        "Demande de Devis",
        "Obtenez votre devis personnalisé",
        vec![
            FormField::new("nom", FieldType::Text, "Votre nom complet", true),
            FormField::new("email", FieldType::Email, "votre@email.com", true),
            FormField::new("entreprise", FieldType::Text, "Nom de votre entreprise", false),
            FormField::new("telephone", FieldType::Tel, "Votre téléphone", true),
            FormField::new("projet", FieldType::Textarea, "Décrivez votre projet...", true),
            FormField::new("budget", FieldType::Select, "Budget estimé", false).with_options(&[
                "< 1000€",
                "1000€ - 5000€",
                "5000€ - 10000€",
                "> 10000€",
            ]),
        ],
    )
}

fn restaurant() -> FormSchema {
    schema(
        FormType::Restaurant,
        "Réservation de Table",
        "Réservez votre table en quelques clics",
        vec![
            FormField::new("nom", FieldType::Text, "Nom de la réservation", true),
            FormField::new("email", FieldType::Email, "votre@email.com", true),
            FormField::new("telephone", FieldType::Tel, "Votre téléphone", true),
            FormField::new("date_reservation", FieldType::Date, "Date souhaitée", true),
            FormField::new("heure_reservation", FieldType::Time, "Heure souhaitée", true),
            FormField::new("nombre_personnes", FieldType::Number, "Nombre de personnes", true),
            FormField::new(
                "allergies",
                FieldType::Textarea,
                "Allergies ou demandes spéciales",
                false,
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_fields_and_cta() {
        for form_type in FormType::ALL {
            let template = template_for(form_type);
            assert!(!template.fields.is_empty());
            assert!(!template.metadata.cta.is_empty());
        }
    }

    #[test]
    fn test_unknown_tags_use_contact_template() {
        assert_eq!(template_for(FormType::Sondage).form_type(), FormType::Contact);
        assert_eq!(template_for(FormType::Custom).title, "Formulaire de Contact");
    }

    #[test]
    fn test_customize_urgent_and_professional() {
        let spec = "Devis urgent pour un client professionnel";
        let form = customize(template_for(FormType::Devis), spec);
        assert!(form.description.starts_with("Obtenez votre devis personnalisé - Traitement prioritaire"));
        assert!(form.description.ends_with(&format!("Basé sur: \"{spec}\"")));
        let entreprise = form.fields.iter().find(|f| f.name == "entreprise").unwrap();
        assert!(entreprise.required);
    }

    #[test]
    fn test_customize_truncates_long_specification() {
        let spec = "é".repeat(150);
        let form = customize(template_for(FormType::Contact), &spec);
        let expected = format!("\"{}...\"", "é".repeat(100));
        assert!(form.description.ends_with(&expected));
    }

    #[test]
    fn test_default_cta_table() {
        assert_eq!(
            default_cta(FormType::Expedition),
            ("Demander un Devis", Some("Réserver l'Expédition"))
        );
        assert_eq!(default_cta(FormType::Restaurant).0, "Réserver la Table");
        assert_eq!(default_cta(FormType::Candidature), ("Envoyer", None));
    }
}
