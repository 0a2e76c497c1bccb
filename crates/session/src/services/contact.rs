//! Contact form

use crate::auth::error_messages::{SEND_CONTACT_FAILED, get_user_friendly_error};
use inkpost_core::ValidationError;
use inkpost_core::validation::{validate_email, validate_name};
use inkpost_http::types::ContactMessage;
use inkpost_http::{ApiClient, ClientError};
use tracing::{info, warn};

const SENT: &str = "Email sent successfully";

/// Send the contact form, returning the confirmation to show
///
/// # Errors
///
/// Returns the validation or API error. Use
/// [`get_user_friendly_error`] with [`SEND_CONTACT_FAILED`] to display it.
pub async fn send_contact(
    client: &ApiClient,
    message: &ContactMessage,
) -> Result<String, ClientError> {
    validate_name(&message.name)?;
    validate_email(&message.email)?;
    if message.service_type.trim().is_empty() {
        return Err(ValidationError::new("serviceType", "Please choose a service").into());
    }
    if message.message.trim().is_empty() {
        return Err(ValidationError::new("message", "Message is required").into());
    }

    match client.send_contact(message).await {
        Ok(response) => {
            info!(service_type = %message.service_type, "contact message sent");
            Ok(response.message.unwrap_or_else(|| SENT.to_string()))
        }
        Err(err) => {
            warn!(
                error = %get_user_friendly_error(&err, SEND_CONTACT_FAILED),
                "contact message failed"
            );
            Err(err)
        }
    }
}
