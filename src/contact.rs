//! Contact form submission.
//!
//! The form is POSTed as JSON `{name, email, message}` to the configured
//! endpoint. The receiving server answers 2xx on success or an error status
//! with `{"error": "..."}` in the body.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);
const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum ContactError {
    /// A required field was blank.
    #[error("All fields are required ({0} is empty)")]
    MissingField(&'static str),
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out")]
    Timeout,
    /// The server rejected the submission; holds its `error` message.
    #[error("{0}")]
    Rejected(String),
}

/// The three form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ServerError {
    error: Option<String>,
}

impl ContactForm {
    /// Checks that every field has non-whitespace content.
    pub fn validate(&self) -> Result<(), ContactError> {
        for (label, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(label));
            }
        }
        Ok(())
    }

    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Submits the form to `endpoint`.
///
/// Validation runs first, so a blank field never reaches the network.
pub async fn submit(
    client: &reqwest::Client,
    endpoint: &str,
    form: &ContactForm,
) -> Result<(), ContactError> {
    form.validate()?;

    let response = tokio::time::timeout(
        SUBMIT_TIMEOUT,
        client.post(endpoint).json(&form.trimmed()).send(),
    )
    .await
    .map_err(|_| ContactError::Timeout)??;

    let status = response.status();
    if status.is_success() {
        tracing::info!(endpoint = %endpoint, "Contact form submitted");
        return Ok(());
    }

    // Fall back to a generic message when the body is not the expected JSON.
    let message = response
        .json::<ServerError>()
        .await
        .ok()
        .and_then(|body| body.error)
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    tracing::warn!(endpoint = %endpoint, status = %status, error = %message, "Contact form rejected");
    Err(ContactError::Rejected(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn form() -> ContactForm {
        ContactForm {
            name: "  Ada ".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
        }
    }

    #[test]
    fn test_validate_requires_all_fields() {
        assert!(form().validate().is_ok());

        let blank_email = ContactForm {
            email: "   ".to_string(),
            ..form()
        };
        assert!(matches!(
            blank_email.validate(),
            Err(ContactError::MissingField("email"))
        ));
        assert!(ContactForm::default().validate().is_err());
    }

    #[tokio::test]
    async fn test_submit_posts_trimmed_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/submit-contact"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello there"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"message": "Contact form submitted successfully"}),
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let endpoint = format!("{}/submit-contact", mock_server.uri());
        submit(&reqwest::Client::new(), &endpoint, &form())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_surfaces_server_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "All fields are required"})),
            )
            .mount(&mock_server)
            .await;

        let err = submit(&reqwest::Client::new(), &mock_server.uri(), &form())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All fields are required");
    }

    #[tokio::test]
    async fn test_submit_non_json_error_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let err = submit(&reqwest::Client::new(), &mock_server.uri(), &form())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[tokio::test]
    async fn test_invalid_form_never_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = submit(
            &reqwest::Client::new(),
            &mock_server.uri(),
            &ContactForm::default(),
        )
        .await;
        assert!(matches!(result, Err(ContactError::MissingField("name"))));
    }
}
