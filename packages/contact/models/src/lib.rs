#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Contact form request and response types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

/// A contact form as submitted by the browser.
///
/// The short form only sends `name`, `email` and `message`; the consulting
/// request form adds the remaining fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub phone: Option<String>,
    /// Free text so the user can type "about 400"; validated as a number.
    pub acreage: Option<String>,
    pub crop_types: Vec<String>,
    pub service_type: Option<ServiceType>,
    pub preferred_contact: Option<ContactMethod>,
}

impl ContactForm {
    /// A short-form submission.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Services a request can be about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ServiceType {
    SoilSampling,
    NutrientManagement,
    PrecisionAg,
    OnFarmTrials,
    CropScouting,
    Other,
}

impl ServiceType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoilSampling => "Soil Sampling",
            Self::NutrientManagement => "Nutrient Management",
            Self::PrecisionAg => "Precision Agriculture",
            Self::OnFarmTrials => "On-Farm Trials",
            Self::CropScouting => "Crop Scouting",
            Self::Other => "Other",
        }
    }
}

/// How the requester wants to be reached.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Either,
}

/// Form fields that can carry a validation error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ContactField {
    Name,
    Email,
    Message,
    Phone,
    Acreage,
    CropTypes,
    ServiceType,
    PreferredContact,
}

/// A validation error attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: ContactField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// JSON body answered by the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<Uuid>,
}

impl ContactResponse {
    #[must_use]
    pub fn accepted(submission_id: Uuid) -> Self {
        Self {
            success: true,
            message: "Thanks! We'll be in touch shortly.".to_string(),
            errors: Vec::new(),
            submission_id: Some(submission_id),
        }
    }

    #[must_use]
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: "Please correct the highlighted fields.".to_string(),
            errors,
            submission_id: None,
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Vec::new(),
            submission_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn short_form_deserializes_with_defaults() {
        let form: ContactForm = serde_json::from_value(serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "hi"
        }))
        .unwrap();
        assert_eq!(form, ContactForm::new("Dana", "dana@example.com", "hi"));
        assert!(form.crop_types.is_empty());
    }

    #[test]
    fn extended_form_uses_camel_case() {
        let form: ContactForm = serde_json::from_value(serde_json::json!({
            "name": "Dana",
            "email": "dana@example.com",
            "message": "hi",
            "phone": "555-123-4567",
            "acreage": "640",
            "cropTypes": ["corn", "soybeans"],
            "serviceType": "soil_sampling",
            "preferredContact": "phone"
        }))
        .unwrap();
        assert_eq!(form.service_type, Some(ServiceType::SoilSampling));
        assert_eq!(form.preferred_contact, Some(ContactMethod::Phone));
        assert_eq!(form.crop_types.len(), 2);
    }

    #[test]
    fn every_service_type_has_a_label() {
        for service in ServiceType::iter() {
            assert!(!service.label().is_empty(), "{service} has no label");
        }
    }

    #[test]
    fn invalid_response_lists_errors() {
        let response =
            ContactResponse::invalid(vec![FieldError::new(ContactField::Name, "Name is required")]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["field"], "name");
        assert!(json.get("submissionId").is_none());
    }
}
