//! Browser-side submission of contact forms.

use fieldmap_contact_models::{ContactForm, ContactResponse, FieldError};

use crate::transport::ContactTransport;
use crate::validate::validate;

/// Shown when delivery fails for any reason.
pub const GENERIC_FAILURE: &str =
    "Something went wrong sending your message. Please try again.";

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form failed validation; nothing was sent.
    Invalid(Vec<FieldError>),
    /// The endpoint answered.
    Sent(ContactResponse),
    /// Delivery failed; the form is unchanged and can be resubmitted.
    Failed { message: String },
}

/// Validates and submits contact forms.
#[derive(Debug, Clone)]
pub struct ContactClient<T: ContactTransport> {
    transport: T,
}

impl<T: ContactTransport> ContactClient<T> {
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates `form` and, only if every check passes, sends it once.
    pub async fn submit(&self, form: &ContactForm) -> SubmitOutcome {
        let submission = match validate(form) {
            Ok(submission) => submission,
            Err(errors) => {
                log::debug!("Contact form has {} invalid fields", errors.len());
                return SubmitOutcome::Invalid(errors);
            }
        };

        match self.transport.send(submission.form()).await {
            Ok(response) if !response.errors.is_empty() => {
                SubmitOutcome::Invalid(response.errors)
            }
            Ok(response) => SubmitOutcome::Sent(response),
            Err(e) => {
                log::error!("Contact submission failed: {e}");
                SubmitOutcome::Failed {
                    message: GENERIC_FAILURE.to_string(),
                }
            }
        }
    }
}
