//! Field-name heuristics over flat submission data.
//!
//! Submissions come from arbitrary generated forms, so there is no schema to
//! tell which field holds the sender's name or the parcel weight. Each
//! semantic role has an ordered alias list; the first alias present with a
//! non-empty value wins.

use formcraft_types::submission::{NormalizedContact, ShipmentDetails, SubmissionFields};

/// Display name used when no name-like field is present.
pub const DEFAULT_DISPLAY_NAME: &str = "cher client";

/// Semantic role a submitted field can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Name,
    Email,
    Message,
    Origin,
    Destination,
    Weight,
    Sender,
    SenderPhone,
    Receiver,
    ReceiverPhone,
    ServiceType,
}

impl FieldRole {
    /// Candidate field names for this role, in priority order.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            FieldRole::Name => &[
                "nom",
                "prenom",
                "nom_complet",
                "nom_du_contact",
                "contact",
                "name",
                "full_name",
                "first_name",
                "last_name",
                "client_name",
                "nom_client",
            ],
            FieldRole::Email => &["email", "mail", "e_mail", "adresse_email", "courriel"],
            FieldRole::Message => &[
                "message",
                "commentaires",
                "description",
                "demande",
                "details",
                "contenu",
                "texte",
                "remarques",
                "observations",
                "notes",
            ],
            FieldRole::Origin => &["ville_origine", "origine", "depart"],
            FieldRole::Destination => &["ville_destination", "destination", "arrivee"],
            FieldRole::Weight => &["poids_colis", "poids"],
            FieldRole::Sender => &["nom_expediteur", "expediteur"],
            FieldRole::SenderPhone => &["tel_expediteur", "telephone_expediteur"],
            FieldRole::Receiver => &["nom_destinataire", "destinataire"],
            FieldRole::ReceiverPhone => &["tel_destinataire", "telephone_destinataire"],
            FieldRole::ServiceType => &["type_envoi", "service"],
        }
    }
}

/// Return the trimmed value of the first alias with non-empty text.
///
/// File references never match.
pub fn find_field<'a>(fields: &'a SubmissionFields, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        fields
            .get(*alias)
            .and_then(|value| value.as_text())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    })
}

/// [`find_field`] for a [`FieldRole`], returning an owned value.
pub fn find_role(fields: &SubmissionFields, role: FieldRole) -> Option<String> {
    find_field(fields, role.aliases()).map(str::to_string)
}

/// Resolve name, email and message.
pub fn normalize_contact(fields: &SubmissionFields) -> NormalizedContact {
    NormalizedContact {
        name: find_role(fields, FieldRole::Name),
        email: find_role(fields, FieldRole::Email),
        message: find_role(fields, FieldRole::Message),
    }
}

/// Resolve every shipment-specific role.
pub fn detect_shipment(fields: &SubmissionFields) -> ShipmentDetails {
    ShipmentDetails {
        origin: find_role(fields, FieldRole::Origin),
        destination: find_role(fields, FieldRole::Destination),
        weight: find_role(fields, FieldRole::Weight),
        sender: find_role(fields, FieldRole::Sender),
        sender_phone: find_role(fields, FieldRole::SenderPhone),
        receiver: find_role(fields, FieldRole::Receiver),
        receiver_phone: find_role(fields, FieldRole::ReceiverPhone),
        service_type: find_role(fields, FieldRole::ServiceType),
    }
}

/// Name to greet the submitter with: sender, then name, then a generic salutation.
pub fn display_name(fields: &SubmissionFields) -> String {
    find_role(fields, FieldRole::Sender)
        .or_else(|| find_role(fields, FieldRole::Name))
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use formcraft_types::submission::{FieldValue, FileRef};

    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> SubmissionFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_first_alias_wins_not_most_specific() {
        // "nom" precedes "full_name" in the alias list
        let data = fields(&[("full_name", "Jean Dupont"), ("nom", "Jean")]);
        assert_eq!(find_field(&data, FieldRole::Name.aliases()), Some("Jean"));
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let data = fields(&[("nom", "   "), ("prenom", "Awa")]);
        assert_eq!(find_role(&data, FieldRole::Name).as_deref(), Some("Awa"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let data = fields(&[("courriel", "  awa@example.com \n")]);
        assert_eq!(
            find_role(&data, FieldRole::Email).as_deref(),
            Some("awa@example.com")
        );
    }

    #[test]
    fn test_not_found_when_no_alias_present() {
        let data = fields(&[("societe", "ACME")]);
        assert!(find_role(&data, FieldRole::Name).is_none());
        assert!(find_role(&data, FieldRole::Email).is_none());
        assert!(find_role(&data, FieldRole::Message).is_none());
    }

    #[test]
    fn test_every_alias_is_reachable() {
        let roles = [
            FieldRole::Name,
            FieldRole::Email,
            FieldRole::Message,
            FieldRole::Origin,
            FieldRole::Destination,
            FieldRole::Weight,
            FieldRole::Sender,
            FieldRole::SenderPhone,
            FieldRole::Receiver,
            FieldRole::ReceiverPhone,
            FieldRole::ServiceType,
        ];
        for role in roles {
            for alias in role.aliases() {
                let data = fields(&[(*alias, "valeur")]);
                assert_eq!(
                    find_role(&data, role).as_deref(),
                    Some("valeur"),
                    "alias {alias} of {role:?}"
                );
            }
        }
    }

    #[test]
    fn test_file_references_never_match() {
        let mut data = SubmissionFields::new();
        data.insert(
            "message".to_string(),
            FieldValue::File(FileRef {
                url: "http://localhost/blobs/uploads/a.pdf".to_string(),
                filename: "a.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                size: 3,
            }),
        );
        data.insert("notes".to_string(), "voir pièce jointe".into());
        assert_eq!(
            find_role(&data, FieldRole::Message).as_deref(),
            Some("voir pièce jointe")
        );
    }

    #[test]
    fn test_detect_shipment() {
        let data = fields(&[
            ("ville_origine", "Abidjan"),
            ("destination", "Paris"),
            ("poids", "5"),
            ("expediteur", "Jean"),
            ("tel_destinataire", "+33 6 00 00 00 00"),
        ]);
        let shipment = detect_shipment(&data);
        assert_eq!(shipment.origin.as_deref(), Some("Abidjan"));
        assert_eq!(shipment.destination.as_deref(), Some("Paris"));
        assert_eq!(shipment.weight.as_deref(), Some("5"));
        assert_eq!(shipment.sender.as_deref(), Some("Jean"));
        assert!(shipment.receiver.is_none());
        assert!(shipment.receiver_phone.is_some());
    }

    #[test]
    fn test_display_name_prefers_sender() {
        let data = fields(&[("nom", "Awa"), ("nom_expediteur", "Jean")]);
        assert_eq!(display_name(&data), "Jean");
        assert_eq!(display_name(&fields(&[("nom", "Awa")])), "Awa");
        assert_eq!(display_name(&SubmissionFields::new()), DEFAULT_DISPLAY_NAME);
    }

    #[test]
    fn test_normalize_contact() {
        let data = fields(&[("name", "Awa"), ("demande", "Un devis svp")]);
        let contact = normalize_contact(&data);
        assert_eq!(contact.name.as_deref(), Some("Awa"));
        assert!(contact.email.is_none());
        assert_eq!(contact.message.as_deref(), Some("Un devis svp"));
    }
}
