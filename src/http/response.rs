//! Response construction helpers.
//!
//! # Responsibilities
//! - Build the common responses handlers return (text, JSON, redirects)
//! - Provide the transport-level 404/500 responses for unresolved dispatches
//!
//! # Design Decisions
//! - The router never renders status codes itself; only the hosting
//!   transport maps declines and errors to 404/500

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::routing::{HandlerResult, Outcome};

/// The response type produced by handlers.
pub type Response = axum::response::Response;

/// `200 OK` with a `text/plain` body.
pub fn text(body: impl Into<String>) -> Response {
    body.into().into_response()
}

/// `200 OK` with a JSON body.
pub fn json<T: Serialize>(value: &T) -> Response {
    axum::Json(value).into_response()
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Finish a handler with `response`.
pub fn respond(response: Response) -> HandlerResult {
    Ok(Outcome::Handled(response))
}

/// Finish a handler by declining the request, letting the router fall through.
pub fn decline() -> HandlerResult {
    Ok(Outcome::decline())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_sets_location() {
        let res = redirect("/elsewhere");
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], "/elsewhere");
    }

    #[test]
    fn test_text_content_type() {
        let res = text("hi");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_transport_statuses() {
        assert_eq!(not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(internal_error().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
