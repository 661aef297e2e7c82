//! Port for bearer credential verification.
//!
//! Token issuance lives outside this service. The verifier only checks a
//! presented token and reports who it belongs to.

use async_trait::async_trait;

use crate::domain::VerifiedIdentity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential verifiers.
    pub enum CredentialVerifierError {
        /// The token is malformed, expired, or carries a bad signature.
        Invalid { message: String } => "credential rejected: {message}",
        /// The verifier could not reach its key material.
        Unavailable { message: String } => "credential verifier unavailable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `token` and resolve the identity it was issued to.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, CredentialVerifierError>;
}

/// Fixture verifier that rejects every token.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialVerifier;

#[async_trait]
impl CredentialVerifier for FixtureCredentialVerifier {
    async fn verify(&self, _token: &str) -> Result<VerifiedIdentity, CredentialVerifierError> {
        Err(CredentialVerifierError::invalid("fixture verifier accepts no tokens"))
    }
}
