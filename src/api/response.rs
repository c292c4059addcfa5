//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

/// Hold data for a successful API interaction
pub struct Success<V>
where
    V: Serialize,
{
    status_code: StatusCode,
    data: Option<V>,
}

impl<V> Success<V>
where
    V: Serialize,
{
    pub fn ok(data: V) -> Self {
        Self {
            status_code: StatusCode::OK,
            data: Some(data),
        }
    }

    pub fn created(data: V) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            data: Some(data),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status_code: StatusCode::NO_CONTENT,
            data: None,
        }
    }
}

impl<V> IntoResponse for Success<V>
where
    V: Serialize,
{
    fn into_response(self) -> Response {
        if let Some(data) = self.data {
            (self.status_code, Json(data)).into_response()
        } else {
            self.status_code.into_response()
        }
    }
}

/// A single violated constraint of a request
#[derive(Debug, Serialize)]
pub struct FieldError {
    /// Name of the field, as sent by the client
    pub field: &'static str,

    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    pub fn new<M>(field: &'static str, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Hold data for a failed API interaction
#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    message: String,
    description: Option<String>,
    fields: Vec<FieldError>,
}

impl Error {
    fn new<M>(status_code: StatusCode, message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code,
            message: message.to_string(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable_entity<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_server_error<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_description<M>(self, description: M) -> Self
    where
        M: ToString,
    {
        Self {
            description: Some(description.to_string()),
            ..self
        }
    }

    pub fn with_fields(self, fields: Vec<FieldError>) -> Self {
        Self { fields, ..self }
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
                description: self.description,
                fields: self.fields,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body() {
        let error = Error::unprocessable_entity("Validation error")
            .with_fields(vec![FieldError::new("title", "Too long")]);

        let body = serde_json::to_value(ErrorWrapper {
            error: error.message,
            description: error.description,
            fields: error.fields,
        })
        .unwrap();

        assert_eq!(
            serde_json::json!({
                "error": "Validation error",
                "fields": [{ "field": "title", "message": "Too long" }],
            }),
            body
        );
    }
}
