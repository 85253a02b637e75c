//! Field-level checks for contact forms.

use std::sync::LazyLock;

use fieldmap_contact_models::{ContactField, ContactForm, ContactMethod, FieldError};
use regex::Regex;

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!()));

/// A form that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    form: ContactForm,
    acreage: Option<f64>,
}

impl ValidatedSubmission {
    /// The form exactly as entered.
    #[must_use]
    pub const fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Parsed acreage, if given.
    #[must_use]
    pub const fn acreage(&self) -> Option<f64> {
        self.acreage
    }
}

/// Checks every field of `form` and reports all failures at once.
///
/// # Errors
///
/// Returns one [`FieldError`] per failing field, in form order.
pub fn validate(form: &ContactForm) -> Result<ValidatedSubmission, Vec<FieldError>> {
    let mut errors = Vec::new();

    if form.name.trim().is_empty() {
        errors.push(FieldError::new(ContactField::Name, "Name is required"));
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new(ContactField::Email, "Email is required"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new(
            ContactField::Email,
            "Please enter a valid email address",
        ));
    }

    if form.message.trim().is_empty() {
        errors.push(FieldError::new(ContactField::Message, "Message is required"));
    }

    let phone = form.phone.as_deref().map(str::trim).filter(|p| !p.is_empty());
    match phone {
        None if form.preferred_contact == Some(ContactMethod::Phone) => {
            errors.push(FieldError::new(
                ContactField::Phone,
                "Phone is required when contacting by phone",
            ));
        }
        Some(phone) if phone.chars().filter(char::is_ascii_digit).count() < MIN_PHONE_DIGITS => {
            errors.push(FieldError::new(
                ContactField::Phone,
                "Please enter a valid phone number",
            ));
        }
        _ => {}
    }

    let acreage = match form.acreage.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        None => None,
        Some(raw) => match raw.replace(',', "").parse::<f64>() {
            Ok(acres) if acres.is_finite() && acres >= 0.0 => Some(acres),
            _ => {
                errors.push(FieldError::new(
                    ContactField::Acreage,
                    "Acreage must be a non-negative number",
                ));
                None
            }
        },
    };

    if errors.is_empty() {
        Ok(ValidatedSubmission {
            form: form.clone(),
            acreage,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(form: &ContactForm) -> Vec<ContactField> {
        validate(form)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn empty_name_is_reported() {
        let form = ContactForm::new("", "a@b.com", "hi");
        assert_eq!(fields(&form), vec![ContactField::Name]);
    }

    #[test]
    fn all_required_fields_are_reported_together() {
        let form = ContactForm::new("  ", "", "");
        assert_eq!(
            fields(&form),
            vec![ContactField::Name, ContactField::Email, ContactField::Message]
        );
    }

    #[test]
    fn email_pattern() {
        for bad in ["plainaddress", "a@b", "a b@c.com", "@b.com"] {
            let form = ContactForm::new("Dana", bad, "hi");
            assert_eq!(fields(&form), vec![ContactField::Email], "{bad}");
        }
        assert!(validate(&ContactForm::new("Dana", "dana@farm.co", "hi")).is_ok());
    }

    #[test]
    fn phone_required_only_for_phone_contact() {
        let mut form = ContactForm::new("Dana", "a@b.com", "hi");
        form.preferred_contact = Some(ContactMethod::Email);
        assert!(validate(&form).is_ok());

        form.preferred_contact = Some(ContactMethod::Phone);
        assert_eq!(fields(&form), vec![ContactField::Phone]);

        form.phone = Some("(217) 555-0142".to_string());
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut form = ContactForm::new("Dana", "a@b.com", "hi");
        form.phone = Some("555-0142".to_string());
        assert_eq!(fields(&form), vec![ContactField::Phone]);
    }

    #[test]
    fn acreage_must_be_non_negative_number() {
        let mut form = ContactForm::new("Dana", "a@b.com", "hi");
        form.acreage = Some("1,280".to_string());
        assert_eq!(validate(&form).unwrap().acreage(), Some(1280.0));

        for bad in ["-5", "lots", "NaN"] {
            form.acreage = Some(bad.to_string());
            assert_eq!(fields(&form), vec![ContactField::Acreage], "{bad}");
        }

        form.acreage = Some("   ".to_string());
        assert_eq!(validate(&form).unwrap().acreage(), None);
    }
}
