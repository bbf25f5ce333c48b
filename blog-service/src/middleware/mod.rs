/// Request identity extraction.
///
/// Authentication lives in the upstream gateway; by the time a request
/// reaches this service it carries a trusted `X-User-Id` header (or none,
/// for anonymous traffic). The extractor turns that into an `Identity`
/// without ever failing a read-only request: missing header means
/// anonymous, and the access policy decides what anonymity may do.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, error::ErrorBadRequest, Error, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::Identity;

/// Header set by the upstream gateway after authentication.
pub const IDENTITY_HEADER: &str = "X-User-Id";

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = match req.headers().get(IDENTITY_HEADER) {
            None => Ok(Identity::Anonymous),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
                .map(Identity::User)
                .ok_or_else(|| ErrorBadRequest("malformed X-User-Id header")),
        };
        ready(identity)
    }
}
