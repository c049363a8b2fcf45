use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures::future;
use std::borrow::Cow;

use crate::handlers::error::HttpErrorResponse;

/// Header the authenticating reverse proxy sets after validating the caller's
/// Google session. Requests reaching this server without it were not
/// authenticated upstream.
pub const IDENTITY_HEADER: &str = "UserId";

pub const MAX_IDENTITY_LENGTH: usize = 255;

/// The authenticated caller's Google ID, extracted from [`IDENTITY_HEADER`].
pub struct VerifiedIdentity {
    pub google_id: String,
}

impl FromRequest for VerifiedIdentity {
    type Error = actix_web::error::Error;
    type Future = future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(header) = req.headers().get(IDENTITY_HEADER) else {
            return future::err(
                HttpErrorResponse::IdentityMissing(Cow::Borrowed(
                    "Caller identity header is missing",
                ))
                .into(),
            );
        };

        let Ok(google_id) = header.to_str() else {
            return future::err(
                HttpErrorResponse::IdentityMissing(Cow::Borrowed(
                    "Caller identity header is malformed",
                ))
                .into(),
            );
        };

        if google_id.is_empty() || google_id.len() > MAX_IDENTITY_LENGTH {
            return future::err(
                HttpErrorResponse::IdentityMissing(Cow::Borrowed(
                    "Caller identity header is malformed",
                ))
                .into(),
            );
        }

        future::ok(VerifiedIdentity {
            google_id: String::from(google_id),
        })
    }
}
