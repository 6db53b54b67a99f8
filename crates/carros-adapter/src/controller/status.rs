//! RPC status codes and their mapping from registration errors
//!
//! Codes follow the gRPC canonical numbering so clients that already speak
//! that vocabulary can switch on them directly.

use carros_usecase::RegistrationError;
use serde::{Deserialize, Serialize};

pub const INVALID_INPUT_DESCRIPTION: &str = "invalid input data";
pub const DUPLICATE_PLATE_DESCRIPTION: &str = "car with existing plate";
pub const INTERNAL_DESCRIPTION: &str = "internal error";

/// Transport-level error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    InvalidArgument,
    AlreadyExists,
    Unimplemented,
    Internal,
}

impl StatusCode {
    pub fn code(&self) -> i32 {
        match self {
            StatusCode::InvalidArgument => 3,
            StatusCode::AlreadyExists => 6,
            StatusCode::Unimplemented => 12,
            StatusCode::Internal => 13,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatusCode::InvalidArgument => "INVALID_ARGUMENT",
            StatusCode::AlreadyExists => "ALREADY_EXISTS",
            StatusCode::Unimplemented => "UNIMPLEMENTED",
            StatusCode::Internal => "INTERNAL",
        }
    }
}

impl core::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A status code with its human-readable description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: StatusCode,
    pub description: String,
    /// Offending request fields, for `INVALID_ARGUMENT`
    pub fields: Vec<String>,
}

impl Status {
    pub fn new(code: StatusCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            fields: Vec::new(),
        }
    }

    pub fn invalid_argument() -> Self {
        Self::new(StatusCode::InvalidArgument, INVALID_INPUT_DESCRIPTION)
    }

    pub fn already_exists() -> Self {
        Self::new(StatusCode::AlreadyExists, DUPLICATE_PLATE_DESCRIPTION)
    }

    pub fn unimplemented(method: &str) -> Self {
        Self::new(
            StatusCode::Unimplemented,
            format!("method not found: {}", method),
        )
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::Internal, INTERNAL_DESCRIPTION)
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&RegistrationError> for Status {
    fn from(err: &RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidInput { fields } => {
                Status::invalid_argument().with_fields(fields.iter().map(|f| f.as_str()))
            }
            RegistrationError::DuplicatePlate { .. } => Status::already_exists(),
            // The cause is logged by the service; callers only see INTERNAL.
            RegistrationError::PersistenceFailure(_) => Status::internal(),
        }
    }
}

impl From<RegistrationError> for Status {
    fn from(err: RegistrationError) -> Self {
        Status::from(&err)
    }
}
