//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::{CredentialVerifierError, MockCredentialVerifier};
use crate::domain::{UserId, VerifiedIdentity};

use super::configure_api;
use super::state::HttpState;

/// Token accepted by [`verifier_for`].
pub const TEST_TOKEN: &str = "test-token";

/// Verifier resolving [`TEST_TOKEN`] to `user` and rejecting anything else.
pub fn verifier_for(user: UserId) -> MockCredentialVerifier {
    let mut verifier = MockCredentialVerifier::new();
    verifier.expect_verify().returning(move |token| {
        if token == TEST_TOKEN {
            Ok(VerifiedIdentity::new(user, "Test Channel"))
        } else {
            Err(CredentialVerifierError::invalid("unknown test token"))
        }
    });
    verifier
}

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// Application exposing every API route over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}
