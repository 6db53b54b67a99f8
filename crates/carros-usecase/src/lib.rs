//! # Carros Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the domain and adapters.

pub mod add_car;

pub use add_car::{CarRegistrationService, RegistrationError, RegistrationStage};

pub use carros_domain;
