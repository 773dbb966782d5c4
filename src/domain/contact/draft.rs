//! Add-contact form input and its entry-point validation.

use serde::Deserialize;

use super::{Contact, LastContacted};
use crate::domain::foundation::{ContactId, ValidationError};

/// Phone number used when the form leaves it blank.
pub const DEFAULT_PHONE: &str = "+1 (555) 000-0000";

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

/// Raw add-contact form values.
///
/// Only presence is checked: name, email, company and role must be
/// non-blank. Anything else (email shape, phone format) is accepted as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ContactDraft {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        company: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            company: company.into(),
            role: role.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Checks required fields, reporting the first one that is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("company", &self.company),
            ("role", &self.role),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }
        Ok(())
    }

    /// Validates and builds a contact with a freshly generated id.
    pub fn into_contact(self) -> Result<Contact, ValidationError> {
        self.into_contact_with_id(ContactId::generate())
    }

    /// Validates and builds a contact with the given id.
    pub fn into_contact_with_id(self, id: ContactId) -> Result<Contact, ValidationError> {
        self.validate()?;

        let avatar = avatar_url(&self.name);
        let phone = self
            .phone
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PHONE.to_string());

        Ok(Contact::new(
            id,
            self.name,
            self.email,
            phone,
            self.company,
            self.role,
            avatar,
            LastContacted::Never,
        ))
    }
}

/// Generated initials avatar for a new contact. Spaces encode as `%20`.
fn avatar_url(name: &str) -> String {
    format!(
        "{AVATAR_SERVICE}?name={}&background=random",
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ContactDraft {
        ContactDraft::new("Harvey Specter", "harvey@pearsonhardman.com", "Pearson Hardman", "Senior Partner")
    }

    #[test]
    fn valid_draft_builds_contact() {
        let contact = draft().into_contact_with_id(ContactId::new("c9").unwrap()).unwrap();

        assert_eq!(contact.id().as_str(), "c9");
        assert_eq!(contact.name(), "Harvey Specter");
        assert_eq!(contact.company(), "Pearson Hardman");
        assert_eq!(*contact.last_contacted(), LastContacted::Never);
    }

    #[test]
    fn blank_phone_gets_default() {
        let contact = draft().with_phone("  ").into_contact().unwrap();
        assert_eq!(contact.phone(), DEFAULT_PHONE);

        let contact = draft().into_contact().unwrap();
        assert_eq!(contact.phone(), DEFAULT_PHONE);
    }

    #[test]
    fn provided_phone_is_kept() {
        let contact = draft().with_phone("+1 (555) 222-3333").into_contact().unwrap();
        assert_eq!(contact.phone(), "+1 (555) 222-3333");
    }

    #[test]
    fn avatar_encodes_name() {
        let contact = draft().into_contact().unwrap();
        assert_eq!(
            contact.avatar(),
            "https://ui-avatars.com/api/?name=Harvey%20Specter&background=random"
        );
    }

    #[test]
    fn avatar_escapes_reserved_characters() {
        let contact = ContactDraft::new("Anne & Jo+Co", "a@b.com", "A&J", "Owner")
            .into_contact()
            .unwrap();
        assert_eq!(
            contact.avatar(),
            "https://ui-avatars.com/api/?name=Anne%20%26%20Jo%2BCo&background=random"
        );
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let mut missing_email = draft();
        missing_email.email = String::new();
        assert_eq!(missing_email.validate().unwrap_err().field(), "email");

        let mut missing_role = draft();
        missing_role.role = "   ".to_string();
        assert_eq!(missing_role.into_contact().unwrap_err().field(), "role");
    }

    #[test]
    fn first_blank_field_wins() {
        let err = ContactDraft::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::empty_field("name"));
    }

    #[test]
    fn generated_ids_differ_between_drafts() {
        let a = draft().into_contact().unwrap();
        let b = draft().into_contact().unwrap();
        assert_ne!(a.id(), b.id());
    }
}
