//! Request extractors answering with the error envelope
//!
//! Drop-in replacements for `axum::Json` and `axum::extract::Query`. A body or
//! query string that does not deserialize becomes an [`AppError`] instead of
//! axum's plain-text rejection.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::OrderStatus;

use crate::utils::{AppError, ErrorCode};

/// JSON body extractor and response
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(json_error(rejection)),
        }
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query-string extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(query_error(rejection)),
        }
    }
}

fn json_error(rejection: JsonRejection) -> AppError {
    let detail = rejection.body_text();
    match rejection {
        JsonRejection::JsonDataError(_) => data_error(&detail),
        _ => AppError::with_message(ErrorCode::InvalidRequest, detail),
    }
}

fn query_error(rejection: QueryRejection) -> AppError {
    let detail = rejection.body_text();
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(_) => data_error(&detail),
        _ => AppError::with_message(ErrorCode::InvalidRequest, detail),
    }
}

/// Well-formed input with a field of the wrong shape
fn data_error(detail: &str) -> AppError {
    match failed_field(detail) {
        Some("status") => invalid_status(),
        _ if unknown_status_variant(detail) => invalid_status(),
        Some(field) => AppError::validation(detail).with_detail("field", field),
        None => AppError::validation(detail),
    }
}

/// Serde's enum error when no field path is reported
fn unknown_status_variant(detail: &str) -> bool {
    detail.contains("unknown variant") && detail.contains("`pending`")
}

/// Field path of a deserialization failure
///
/// Rejection texts read `<prefix>: <path>: <serde error>`; errors at the root
/// carry no path.
fn failed_field(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once(": ")?;
    let (path, _) = rest.split_once(": ")?;
    (!path.contains(' ')).then_some(path)
}

fn invalid_status() -> AppError {
    let allowed: Vec<&str> = OrderStatus::ALL.iter().map(OrderStatus::as_str).collect();
    AppError::with_message(
        ErrorCode::InvalidOrderStatus,
        format!("Invalid order status, expected one of: {}", allowed.join(", ")),
    )
    .with_detail("field", "status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request as HttpRequest, header};
    use shared::models::{OrderListQuery, OrderUpdate};

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_order_status() {
        let err = Json::<OrderUpdate>::from_request(json_request(r#"{"status":"shipped"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
        assert!(err.message.contains("pending"));
    }

    #[tokio::test]
    async fn test_wrong_type_names_the_field() {
        let err = Json::<OrderUpdate>::from_request(json_request(r#"{"notes": 5}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap()["field"], "notes");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_request() {
        let err = Json::<OrderUpdate>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);

        let no_content_type = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let err = Json::<OrderUpdate>::from_request(no_content_type, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let Json(update) = Json::<OrderUpdate>::from_request(json_request(r#"{"status":"ready"}"#), &())
            .await
            .unwrap();
        assert_eq!(update.status, Some(OrderStatus::Ready));
    }

    #[tokio::test]
    async fn test_query_status_filter() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/?status=lost")
            .body(())
            .unwrap()
            .into_parts();
        let err = Query::<OrderListQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
    }

    #[test]
    fn test_failed_field() {
        assert_eq!(
            failed_field("Failed to deserialize the JSON body into the target type: items[0].price: invalid type"),
            Some("items[0].price")
        );
        assert_eq!(
            failed_field("Failed to deserialize the JSON body into the target type: missing field `x` at line 1 column 2"),
            None
        );
    }
}
