//! Bearer identity extraction.
//!
//! Handlers that need a caller take [`AuthenticatedUser`] as an argument. The
//! extractor reads `Authorization: Bearer <token>`, verifies it through the
//! [`CredentialVerifier`](crate::domain::ports::CredentialVerifier) port held
//! in [`HttpState`], and yields the verified identity.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, UserId, VerifiedIdentity};
use crate::inbound::http::state::HttpState;

pub(crate) const MISSING_HEADER_MESSAGE: &str = "Authorization header missing";
pub(crate) const INVALID_TOKEN_MESSAGE: &str = "Invalid Token";

/// Identity of the caller, verified from their bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(VerifiedIdentity);

impl AuthenticatedUser {
    pub fn user_id(&self) -> UserId {
        self.0.user_id
    }

    pub fn identity(&self) -> &VerifiedIdentity {
        &self.0
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// The scheme word is required but not checked, matching clients that send
/// `Bearer` in varying case.
fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let _scheme = parts.next()?;
    let token = parts.next()?;
    parts.next().is_none().then_some(token)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_owned));
        let state = req.app_data::<web::Data<HttpState>>().cloned();

        Box::pin(async move {
            let raw = match header {
                None => return Err(Error::unauthorized(MISSING_HEADER_MESSAGE)),
                Some(Err(_)) => return Err(Error::unauthorized(INVALID_TOKEN_MESSAGE)),
                Some(Ok(raw)) => raw,
            };
            let token =
                bearer_token(&raw).ok_or_else(|| Error::unauthorized(INVALID_TOKEN_MESSAGE))?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state missing from application"))?;

            let identity = state.credentials.verify(token).await.map_err(|err| {
                debug!(error = %err, "bearer credential rejected");
                Error::unauthorized(INVALID_TOKEN_MESSAGE)
            })?;
            Ok(Self(identity))
        })
    }
}
