//! Domain Models - The vocabulary of the registration service

pub mod car;
