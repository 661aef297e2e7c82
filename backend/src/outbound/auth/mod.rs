//! Credential verification adapters.

mod jwt_verifier;

pub use jwt_verifier::{JwtCredentialVerifier, TokenClaims};
