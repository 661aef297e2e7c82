//! HS256 bearer token verification backed by `jsonwebtoken`.
//!
//! Tokens are issued elsewhere with the claims `_id`, `channelName`, and an
//! optional `logoId`, plus the standard `exp`. Verification checks the
//! signature and expiry and nothing more; the identity is then trusted.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{CredentialVerifier, CredentialVerifierError};
use crate::domain::{UserId, VerifiedIdentity};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    #[serde(rename = "_id", alias = "sub")]
    pub id: String,
    pub channel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_id: Option<String>,
    pub exp: i64,
}

/// Verifies HS256-signed access tokens.
pub struct JwtCredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    /// Build a verifier for tokens signed with `key`.
    pub fn new(key: DecodingKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self { key, validation }
    }

    /// Convenience constructor taking raw secret bytes.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self::new(DecodingKey::from_secret(secret))
    }

    fn decode_claims(&self, token: &str) -> Result<TokenClaims, CredentialVerifierError> {
        decode::<TokenClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(kind = ?err.kind(), "bearer token rejected");
                CredentialVerifierError::invalid(err.to_string())
            })
    }
}

impl TryFrom<TokenClaims> for VerifiedIdentity {
    type Error = CredentialVerifierError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let user_id = UserId::new(&claims.id)
            .map_err(|err| CredentialVerifierError::invalid(err.to_string()))?;
        let identity = VerifiedIdentity::new(user_id, claims.channel_name);
        Ok(match claims.logo_id {
            Some(logo_id) => identity.with_logo_id(logo_id),
            None => identity,
        })
    }
}

#[async_trait]
impl CredentialVerifier for JwtCredentialVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, CredentialVerifierError> {
        VerifiedIdentity::try_from(self.decode_claims(token)?)
    }
}
