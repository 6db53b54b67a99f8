//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from carros-domain.

pub mod in_memory;
