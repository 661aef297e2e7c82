//! Caller identity resolved from a verified credential.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Subject of a verified bearer credential.
///
/// The identity is trusted as-is; the credential verifier has already
/// checked signature and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    pub user_id: UserId,
    pub channel_name: String,
    pub logo_id: Option<String>,
}

impl VerifiedIdentity {
    pub fn new(user_id: UserId, channel_name: impl Into<String>) -> Self {
        Self {
            user_id,
            channel_name: channel_name.into(),
            logo_id: None,
        }
    }

    pub fn with_logo_id(mut self, logo_id: impl Into<String>) -> Self {
        self.logo_id = Some(logo_id.into());
        self
    }
}
