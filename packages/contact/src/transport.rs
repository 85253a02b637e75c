//! Delivery of validated contact forms to the intake endpoint.

use fieldmap_contact_models::{ContactForm, ContactResponse};

use crate::ContactError;

/// Default intake endpoint, relative to the site origin.
pub const DEFAULT_CONTACT_ENDPOINT: &str = "http://localhost:8080/api/contact";

/// Sends a contact form somewhere.
#[async_trait::async_trait]
pub trait ContactTransport: Send + Sync {
    /// Delivers `form` and returns the endpoint's answer.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] if the request fails or is rejected.
    async fn send(&self, form: &ContactForm) -> Result<ContactResponse, ContactError>;
}

/// POSTs forms as JSON.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Uses `CONTACT_ENDPOINT`, falling back to
    /// [`DEFAULT_CONTACT_ENDPOINT`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("CONTACT_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_CONTACT_ENDPOINT.to_string()),
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ContactTransport for HttpTransport {
    async fn send(&self, form: &ContactForm) -> Result<ContactResponse, ContactError> {
        log::debug!("POST {}", self.endpoint);

        let resp = self.client.post(&self.endpoint).json(form).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        // Validation failures come back as 400 with a regular body.
        let parsed = serde_json::from_str::<ContactResponse>(&body);
        if !status.is_success() && !(status.as_u16() == 400 && parsed.is_ok()) {
            return Err(ContactError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response = parsed?;
        if !response.success && response.errors.is_empty() {
            return Err(ContactError::Rejected {
                message: response.message,
            });
        }
        Ok(response)
    }
}
