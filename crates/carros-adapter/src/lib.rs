//! # Carros Adapter Layer
//!
//! External system integrations (Hexagonal Architecture adapters).
//!
//! ## Structure
//!
//! - `controller/` - Inbound adapters (JSON-RPC over stdio or TCP)
//! - `repository/` - Persistence implementations

pub mod controller;
pub mod repository;

pub use controller::rpc::CarsEndpoint;
pub use controller::status::{Status, StatusCode};
pub use repository::in_memory::InMemoryCarRepository;
