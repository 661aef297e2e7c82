//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path identifiers are parsed here so every handler reports malformed ids
//! with the same `400` payload: `details.field`, `details.value`, and
//! `details.code`.

use serde_json::json;

use crate::domain::{Error, IdValidationError, UserId, VideoId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    EmptyId,
    InvalidUuid,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::EmptyId => "empty_id",
            Self::InvalidUuid => "invalid_uuid",
        }
    }
}

impl From<IdValidationError> for ValidationCode {
    fn from(value: IdValidationError) -> Self {
        match value {
            IdValidationError::Empty { .. } => Self::EmptyId,
            IdValidationError::Invalid { .. } => Self::InvalidUuid,
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const VIDEO_ID: FieldName = FieldName::new("videoId");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");

fn invalid_id_error(field: FieldName, value: &str, error: IdValidationError) -> Error {
    let code = ValidationCode::from(error);
    Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
        json!({
            "field": field.as_str(),
            "value": value,
            "code": code.as_str(),
        }),
    )
}

pub(crate) fn parse_video_id(raw: &str) -> Result<VideoId, Error> {
    VideoId::new(raw).map_err(|err| invalid_id_error(VIDEO_ID, raw, err))
}

pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| invalid_id_error(field, raw, err))
}
