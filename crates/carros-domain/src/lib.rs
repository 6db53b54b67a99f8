//! # Carros Domain Layer
//!
//! Pure business logic of the car registration service, with zero external
//! dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities (CarRecord) & Value Objects (CarId)  ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Domain services (RequestValidator)            ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! If the storage engine or the wire protocol changes, this crate doesn't.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::car::{CarId, CarRecord, NewCar};

pub use repository::car_repository::{CarRepository, RepositoryError};

pub use service::request_validator::{AddCarRequest, CarField, RequestValidator, ValidationResult};
