//! Request Validator - Structural checks on incoming add-car requests
//!
//! Runs before any repository access. Pure: no I/O, no state.

use crate::model::car::NewCar;

/// An add-car request as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCarRequest {
    pub model: String,
    pub plate: String,
}

impl AddCarRequest {
    pub fn new(model: impl Into<String>, plate: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            plate: plate.into(),
        }
    }
}

/// A request field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarField {
    Model,
    Plate,
}

impl CarField {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarField::Model => "model",
            CarField::Plate => "plate",
        }
    }
}

impl core::fmt::Display for CarField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    /// Violated fields, in declaration order (model before plate)
    Invalid { fields: Vec<CarField> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Validates add-car requests
///
/// Both `model` and `plate` must be non-blank: not empty and not made only
/// of whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, request: &AddCarRequest) -> ValidationResult {
        let mut fields = Vec::new();

        if is_blank(&request.model) {
            fields.push(CarField::Model);
        }
        if is_blank(&request.plate) {
            fields.push(CarField::Plate);
        }

        if fields.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid { fields }
        }
    }

    /// Validate and, on success, turn the request into a `NewCar`.
    ///
    /// Field values are kept exactly as submitted; plates are compared
    /// byte-for-byte downstream.
    pub fn accept(&self, request: AddCarRequest) -> Result<NewCar, Vec<CarField>> {
        match self.validate(&request) {
            ValidationResult::Valid => Ok(NewCar::new(request.model, request.plate)),
            ValidationResult::Invalid { fields } => Err(fields),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
