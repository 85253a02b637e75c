//! Server-side intake of contact requests.

use fieldmap_contact_models::{ContactForm, ContactResponse};
use uuid::Uuid;

use crate::ContactError;
use crate::validate::{ValidatedSubmission, validate};

/// Hands accepted submissions to whoever follows up on them.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Reports one accepted submission.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::Notify`] if the notification cannot be
    /// delivered.
    async fn notify(&self, id: Uuid, submission: &ValidatedSubmission) -> Result<(), ContactError>;
}

/// Writes submissions to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, id: Uuid, submission: &ValidatedSubmission) -> Result<(), ContactError> {
        let form = submission.form();
        log::info!(
            "Contact request {id} from {} <{}>: service={} preferred={} acreage={:?} crops={:?}",
            form.name.trim(),
            form.email.trim(),
            form.service_type.map_or("unspecified", |s| s.label()),
            form.preferred_contact.unwrap_or_default(),
            submission.acreage(),
            form.crop_types,
        );
        Ok(())
    }
}

/// Validates incoming forms and notifies on accepted ones.
pub struct ContactService {
    notifier: Box<dyn Notifier>,
}

impl Default for ContactService {
    fn default() -> Self {
        Self::new(Box::new(LogNotifier))
    }
}

impl std::fmt::Debug for ContactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactService").finish_non_exhaustive()
    }
}

impl ContactService {
    #[must_use]
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Handles one submitted form.
    pub async fn handle(&self, form: &ContactForm) -> ContactResponse {
        let submission = match validate(form) {
            Ok(submission) => submission,
            Err(errors) => return ContactResponse::invalid(errors),
        };

        let id = Uuid::new_v4();
        match self.notifier.notify(id, &submission).await {
            Ok(()) => ContactResponse::accepted(id),
            Err(e) => {
                log::error!("Failed to deliver contact request {id}: {e}");
                ContactResponse::failed("We couldn't send your message. Please try again later.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingNotifier {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(
            &self,
            _id: Uuid,
            _submission: &ValidatedSubmission,
        ) -> Result<(), ContactError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ContactError::Notify {
                    message: "mail relay down".to_string(),
                });
            }
            Ok(())
        }
    }

    fn service(fail: bool) -> (ContactService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = CountingNotifier {
            calls: Arc::clone(&calls),
            fail,
        };
        (ContactService::new(Box::new(notifier)), calls)
    }

    #[tokio::test]
    async fn accepted_form_gets_submission_id() {
        let (service, calls) = service(false);
        let response = service
            .handle(&ContactForm::new("Dana", "dana@example.com", "hi"))
            .await;
        assert!(response.success);
        assert!(response.submission_id.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_form_is_not_notified() {
        let (service, calls) = service(false);
        let response = service.handle(&ContactForm::new("", "a@b.com", "hi")).await;
        assert!(!response.success);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn notifier_failure_is_reported() {
        let (service, calls) = service(true);
        let response = service
            .handle(&ContactForm::new("Dana", "dana@example.com", "hi"))
            .await;
        assert!(!response.success);
        assert!(response.errors.is_empty());
        assert!(response.submission_id.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn log_notifier_accepts_everything() {
        let response = ContactService::default()
            .handle(&ContactForm::new("Dana", "dana@example.com", "hi"))
            .await;
        assert!(response.success);
    }
}
