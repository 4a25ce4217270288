//! Request inspection.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Extract guard-relevant information (host, session)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The session is read from headers set by the trusted auth proxy in
//!   front of the guard; a missing user id means anonymous
//! - Host falls back to the URI authority (HTTP/2 requests carry no Host)

use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::session::{Session, UserIdentity};

pub const X_AUTH_USER_ID: &str = "x-auth-user-id";
pub const X_AUTH_USERNAME: &str = "x-auth-username";
pub const X_AUTH_ROLE: &str = "x-auth-role";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build the viewer's session from auth proxy headers.
pub fn session_from_headers(headers: &HeaderMap) -> Session {
    let Some(id) = header_str(headers, X_AUTH_USER_ID) else {
        return Session::anonymous();
    };
    let username = header_str(headers, X_AUTH_USERNAME).unwrap_or(id);
    let role = header_str(headers, X_AUTH_ROLE).unwrap_or_default();
    Session::authenticated(UserIdentity::with_raw_role(id, username, role))
}

/// Host the request was addressed to.
pub fn request_host<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use crate::session::Role;

    #[test]
    fn test_anonymous_without_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert(X_AUTH_ROLE, HeaderValue::from_static("admin"));
        assert_eq!(session_from_headers(&headers), Session::anonymous());
    }

    #[test]
    fn test_session_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(X_AUTH_USER_ID, HeaderValue::from_static("42"));
        headers.insert(X_AUTH_ROLE, HeaderValue::from_static("Doctor"));

        let session = session_from_headers(&headers);
        let user = session.user.unwrap();
        assert_eq!(user.username, "42");
        assert_eq!(user.role().unwrap(), Role::Doctor);
    }

    #[test]
    fn test_request_host() {
        let req = Request::builder()
            .uri("/dashboard")
            .header("Host", "doctor.medcitas.com:8080")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), "doctor.medcitas.com:8080");

        let req = Request::builder()
            .uri("https://admin.medcitas.com/dashboard")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_host(&req), "admin.medcitas.com");
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let mut make = MakeRequestUuidV4;
        let a = make.make_request_id(&req).unwrap();
        let b = make.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
