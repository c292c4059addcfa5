//! API request helpers

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Error;
use super::FieldError;

/// Constraints on a deserialized form
///
/// Forms without constraints can rely on the default implementation
pub trait Validate {
    /// Collect all violated constraints
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

/// Check the number of characters of a text field
pub fn validate_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
    errors: &mut Vec<FieldError>,
) {
    let length = value.chars().count();

    if length < min {
        errors.push(FieldError::new(
            field,
            format!("Should have at least {min} character(s)"),
        ));
    } else if let Some(max) = max.filter(|max| length > *max) {
        errors.push(FieldError::new(
            field,
            format!("Should have at most {max} characters"),
        ));
    }
}

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::unprocessable_entity("Data error").with_description(err.body_text()))
            }
            JsonRejection::JsonSyntaxError(err) => {
                let description = std::error::Error::source(&err)
                    .map_or_else(|| err.body_text(), ToString::to_string);

                Err(Error::bad_request("JSON syntax error").with_description(description))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => {
                Err(Error::bad_request("Invalid characters in JSON").with_description(err))
            }
            err => Err(Error::bad_request("Unknown JSON error").with_description(err)),
        },
    }
}

/// Wrapper for the JSON extractor
///
/// Deserialization problems and violated constraints end up as an [`Error`]
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Validate + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Json::<F>::from_request(req, state).await;

        let form = parse_json(json)?;

        let errors = form.validate();
        if !errors.is_empty() {
            return Err(Error::unprocessable_entity("Validation error").with_fields(errors));
        }

        Ok(Form(form))
    }
}

fn parse_path<P>(path: Result<Path<P>, PathRejection>) -> Result<P, Error> {
    match path {
        Ok(Path(path)) => Ok(path),
        Err(err) => match err {
            PathRejection::FailedToDeserializePathParams(err) => {
                Err(Error::bad_request("Invalid path parameter").with_description(err.body_text()))
            }
            PathRejection::MissingPathParams(err) => {
                Err(Error::bad_request("Missing path parameter").with_description(err))
            }
            err => Err(Error::bad_request("Unknown path error").with_description(err)),
        },
    }
}

/// Wrapper for the path extractor
pub struct PathParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for PathParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = Path::<P>::from_request_parts(parts, state).await;

        parse_path(path).map(PathParameters)
    }
}

fn parse_query<Q>(query: Result<Query<Q>, QueryRejection>) -> Result<Q, Error> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(err) => Err(
            Error::unprocessable_entity("Invalid query parameter").with_description(err.body_text())
        ),
    }
}

/// Wrapper for the query string extractor
///
/// Violated constraints end up as an [`Error`], like the [`Form`]
pub struct QueryParameters<Q>(pub Q);

impl<S, Q> FromRequestParts<S> for QueryParameters<Q>
where
    S: Send + Sync,
    Q: DeserializeOwned + Validate + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = parse_query(Query::<Q>::from_request_parts(parts, state).await)?;

        let errors = query.validate();
        if !errors.is_empty() {
            return Err(Error::unprocessable_entity("Invalid query parameter").with_fields(errors));
        }

        Ok(QueryParameters(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length() {
        let mut errors = Vec::new();

        validate_length("title", "Hi", 1, Some(150), &mut errors);
        assert!(errors.is_empty());

        validate_length("title", "", 1, Some(150), &mut errors);
        assert_eq!(1, errors.len());
        assert_eq!("title", errors[0].field);

        // characters, not bytes
        let title = "é".repeat(150);
        let mut errors = Vec::new();
        validate_length("title", &title, 1, Some(150), &mut errors);
        assert!(errors.is_empty());

        let title = "a".repeat(151);
        validate_length("title", &title, 1, Some(150), &mut errors);
        assert_eq!(
            "Should have at most 150 characters".to_string(),
            errors[0].message
        );

        let mut errors = Vec::new();
        validate_length("content", &"a".repeat(10_000), 1, None, &mut errors);
        assert!(errors.is_empty());
    }
}
