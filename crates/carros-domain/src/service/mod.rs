//! Domain Services - Rules that don't belong to a single entity

pub mod request_validator;
