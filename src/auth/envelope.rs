//! The `{success, message, data?, errors?}` wrapper every auth endpoint
//! returns, and the rules for turning it into a `Result`.
//!
//! Only `success` is required. Everything else is read loosely so that a
//! rejection always resolves to a readable message, whatever shape the
//! server gave the rest of the body.

use super::error::{AuthError, Operation};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::marker::PhantomData;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `T` is the shape `data` must have when `success` is true; it is only
/// checked then.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<FieldError>>,
    #[serde(skip)]
    pub(crate) status: StatusCode,
    #[serde(skip)]
    payload: PhantomData<T>,
}

impl<T> ApiResponse<T> {
    /// Picks the message to surface for a rejected call: first field error,
    /// then the envelope message, then the operation default.
    #[must_use]
    pub fn error_message(&self, operation: Operation) -> String {
        let field_message = self
            .first_error()
            .and_then(|error| non_blank(error.message.as_deref()));
        if let Some(message) = field_message {
            return message.to_string();
        }

        non_blank(self.message.as_deref())
            .unwrap_or(operation.default_message())
            .to_string()
    }

    fn first_error(&self) -> Option<&FieldError> {
        self.errors.as_deref().and_then(<[FieldError]>::first)
    }

    fn rejection(&self, operation: Operation) -> AuthError {
        let field = self
            .first_error()
            .filter(|error| non_blank(error.message.as_deref()).is_some())
            .and_then(|error| error.field.clone());

        AuthError::Rejected {
            message: self.error_message(operation),
            field,
        }
    }

    /// Unwraps an envelope whose payload, if any, is ignored.
    ///
    /// # Errors
    /// `Rejected` when `success` is false.
    pub fn into_unit(self, operation: Operation) -> Result<(), AuthError> {
        if self.success {
            Ok(())
        } else {
            Err(self.rejection(operation))
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Unwraps an envelope that must carry `data` on success.
    ///
    /// # Errors
    /// `Rejected` when `success` is false, `MissingData` when `data` is absent
    /// or null, `Decode` when it does not have the expected shape.
    pub fn into_data(self, operation: Operation) -> Result<T, AuthError> {
        if !self.success {
            return Err(self.rejection(operation));
        }

        match self.data {
            None | Some(Value::Null) => Err(AuthError::MissingData(operation)),
            Some(data) => serde_json::from_value(data).map_err(|source| AuthError::Decode {
                status: self.status,
                source,
            }),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn envelope(value: Value) -> ApiResponse<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn field_error_wins_over_message() {
        let response = envelope(json!({
            "success": false,
            "message": "bad request",
            "errors": [{"field": "email", "message": "taken"}]
        }));
        assert_eq!(response.error_message(Operation::Register), "taken");

        match response.into_data(Operation::Register) {
            Err(AuthError::Rejected { message, field }) => {
                assert_eq!(message, "taken");
                assert_eq!(field.as_deref(), Some("email"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn message_used_without_field_errors() {
        let response = envelope(json!({"success": false, "message": "bad request"}));
        assert_eq!(response.error_message(Operation::Login), "bad request");

        let empty_errors = envelope(json!({
            "success": false,
            "message": "bad request",
            "errors": []
        }));
        assert_eq!(empty_errors.error_message(Operation::Login), "bad request");
    }

    #[test]
    fn default_message_when_nothing_else() {
        let response = envelope(json!({"success": false}));
        assert_eq!(
            response.error_message(Operation::ChangePassword),
            "Failed to change password"
        );

        let blank = envelope(json!({"success": false, "message": "  "}));
        assert_eq!(blank.error_message(Operation::Logout), "Logout failed");
    }

    #[test]
    fn blank_field_error_falls_through() {
        let response = envelope(json!({
            "success": false,
            "message": "bad request",
            "errors": [{"field": "email", "message": ""}]
        }));
        assert_eq!(response.error_message(Operation::Register), "bad request");
    }

    #[test]
    fn success_without_data_is_contract_violation() {
        let response = envelope(json!({"success": true, "message": "ok"}));
        assert!(matches!(
            response.into_data(Operation::CurrentUser),
            Err(AuthError::MissingData(Operation::CurrentUser))
        ));
    }

    #[test]
    fn success_with_null_data_is_contract_violation() {
        let response: ApiResponse<u32> =
            serde_json::from_value(json!({"success": true, "message": "ok", "data": null}))
                .unwrap();
        assert!(matches!(
            response.into_data(Operation::ConfirmEmail),
            Err(AuthError::MissingData(Operation::ConfirmEmail))
        ));
    }

    #[test]
    fn unit_ignores_missing_data() {
        let response = envelope(json!({"success": true, "message": "sent"}));
        assert!(response.into_unit(Operation::SendConfirmation).is_ok());

        let rejected = envelope(json!({"success": false}));
        assert_eq!(
            rejected
                .into_unit(Operation::SendPasswordReset)
                .unwrap_err()
                .to_string(),
            "Failed to send password reset email"
        );
    }

    #[test]
    fn null_message_falls_back_to_default() {
        let response = envelope(json!({"success": false, "message": null}));
        assert_eq!(response.error_message(Operation::Login), "Login failed");
    }

    #[test]
    fn rejection_ignores_data_shape() {
        let response: ApiResponse<u32> = serde_json::from_value(json!({
            "success": false,
            "message": "Invalid credentials",
            "data": {}
        }))
        .unwrap();
        assert_eq!(
            response.into_data(Operation::Login).unwrap_err().to_string(),
            "Invalid credentials"
        );
    }

    #[test]
    fn field_error_without_field_name() {
        let response = envelope(json!({
            "success": false,
            "message": "bad",
            "errors": [{"message": "taken"}, {"field": null}]
        }));
        match response.into_unit(Operation::Register) {
            Err(AuthError::Rejected { message, field }) => {
                assert_eq!(message, "taken");
                assert_eq!(field, None);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn success_with_wrong_data_shape_is_decode_error() {
        let response: ApiResponse<u32> =
            serde_json::from_value(json!({"success": true, "data": {"user": 1}})).unwrap();
        assert!(matches!(
            response.into_data(Operation::CurrentUser),
            Err(AuthError::Decode { .. })
        ));
    }
}
