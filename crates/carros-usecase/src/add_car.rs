//! Add Car - Registration of a single vehicle record
//!
//! ```text
//! Received → Validating ──────────────┬─→ InvalidInput
//!                                     ↓
//!                            CheckingUniqueness ─→ DuplicatePlate
//!                                     ↓
//!                                Persisting ──────┬─→ Persisted
//!                                                 └─→ PersistenceFailure
//! ```
//!
//! Every failure short-circuits the remaining steps. Nothing is retried.

use carros_domain::{
    AddCarRequest, CarField, CarRecord, CarRepository, RepositoryError, RequestValidator,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Terminal state a registration call ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    InvalidInput,
    DuplicatePlate,
    PersistenceFailure,
    Persisted,
}

impl RegistrationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStage::InvalidInput => "invalid_input",
            RegistrationStage::DuplicatePlate => "duplicate_plate",
            RegistrationStage::PersistenceFailure => "persistence_failure",
            RegistrationStage::Persisted => "persisted",
        }
    }
}

/// Why a registration was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// One or more required fields are blank
    #[error("invalid input data")]
    InvalidInput { fields: Vec<CarField> },

    /// Another record already holds this plate
    #[error("car with existing plate")]
    DuplicatePlate { plate: String },

    /// The repository failed for a reason unrelated to business rules
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[source] RepositoryError),
}

impl RegistrationError {
    pub fn stage(&self) -> RegistrationStage {
        match self {
            RegistrationError::InvalidInput { .. } => RegistrationStage::InvalidInput,
            RegistrationError::DuplicatePlate { .. } => RegistrationStage::DuplicatePlate,
            RegistrationError::PersistenceFailure(_) => RegistrationStage::PersistenceFailure,
        }
    }
}

impl From<RepositoryError> for RegistrationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A writer that slipped past the pre-check is still a duplicate.
            RepositoryError::UniquePlateViolation { plate } => {
                RegistrationError::DuplicatePlate { plate }
            }
            other => RegistrationError::PersistenceFailure(other),
        }
    }
}

/// Registers cars against a repository
///
/// Holds no mutable state of its own; share it behind an `Arc` across
/// concurrent callers.
#[derive(Debug)]
pub struct CarRegistrationService<R> {
    repository: R,
    validator: RequestValidator,
}

impl<R: CarRepository> CarRegistrationService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            validator: RequestValidator::new(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validate, check plate uniqueness, then persist.
    ///
    /// Performs one `exists_by_plate` call and, only when the plate is free,
    /// one `save` call. The returned record carries the id chosen by the
    /// repository.
    pub fn add(&self, request: AddCarRequest) -> Result<CarRecord, RegistrationError> {
        let result = self.register(request);

        match &result {
            Ok(record) => info!(
                id = record.id().value(),
                plate = record.plate(),
                stage = RegistrationStage::Persisted.as_str(),
                "Car registered"
            ),
            Err(err @ RegistrationError::PersistenceFailure(cause)) => error!(
                stage = err.stage().as_str(),
                cause = %cause,
                "Car registration failed"
            ),
            Err(err) => warn!(stage = err.stage().as_str(), "Car registration refused: {}", err),
        }

        result
    }

    fn register(&self, request: AddCarRequest) -> Result<CarRecord, RegistrationError> {
        debug!(model = %request.model, plate = %request.plate, "Validating add-car request");

        let car = self
            .validator
            .accept(request)
            .map_err(|fields| RegistrationError::InvalidInput { fields })?;

        if self.repository.exists_by_plate(car.plate())? {
            return Err(RegistrationError::DuplicatePlate {
                plate: car.plate().to_string(),
            });
        }

        Ok(self.repository.save(car)?)
    }
}
