//! Structured-generation prompt for the form designer.

use formcraft_types::form::FormType;

use super::templates::template_for;

/// Build the prompt asking the model for a form schema as strict JSON.
///
/// The expedition template is embedded verbatim so shipment requests come
/// back with the field names the submission heuristics expect.
pub fn build_design_prompt(specification: &str) -> String {
    let shipment_example = serde_json::to_string_pretty(&template_for(FormType::Expedition))
        .unwrap_or_default();

    format!(
        "Tu es un expert en création de formulaires web. Analyse cette demande et génère un \
         formulaire JSON précis.\n\
         \n\
         DEMANDE: \"{specification}\"\n\
         \n\
         INSTRUCTIONS SPÉCIALES POUR EXPÉDITION/COLIS:\n\
         Si la demande concerne l'expédition, le transport, les colis, ou contient des mots comme \
         \"Abidjan\", \"Paris\", \"expédier\", \"colis\", \"envoi\", utilise EXACTEMENT cette structure :\n\
         \n\
         {shipment_example}\n\
         \n\
         POUR AUTRES TYPES DE FORMULAIRES:\n\
         1. Analyse la demande pour identifier le type\n\
         2. Extrais tous les champs nécessaires\n\
         3. Détermine les types appropriés (text, email, tel, number, select, textarea, file, date, time)\n\
         4. Pour les select, génère des options pertinentes\n\
         5. Identifie les champs obligatoires vs optionnels\n\
         6. Crée un titre et une description appropriés\n\
         7. Ajoute un CTA adapté dans _metadata\n\
         \n\
         FORMAT DE RÉPONSE (JSON strict):\n\
         {{\n\
         \x20 \"title\": \"Titre du formulaire\",\n\
         \x20 \"description\": \"Description courte\",\n\
         \x20 \"fields\": [\n\
         \x20   {{\n\
         \x20     \"name\": \"nom_du_champ\",\n\
         \x20     \"type\": \"type_du_champ\",\n\
         \x20     \"placeholder\": \"Texte d'aide\",\n\
         \x20     \"required\": true,\n\
         \x20     \"options\": [\"option1\", \"option2\"]\n\
         \x20   }}\n\
         \x20 ],\n\
         \x20 \"_metadata\": {{\n\
         \x20   \"formType\": \"expedition|restaurant|devis|contact|inscription|sondage|candidature|custom\",\n\
         \x20   \"cta\": \"Texte du bouton principal\",\n\
         \x20   \"ctaSecondary\": \"Texte du bouton secondaire (optionnel)\"\n\
         \x20 }}\n\
         }}\n\
         \n\
         \"options\" uniquement pour le type \"select\".\n\
         \n\
         GÉNÈRE MAINTENANT LE FORMULAIRE JSON:"
    )
}
