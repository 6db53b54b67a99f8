//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait CarRepository   │  InMemoryCarRepository
//!   fn exists_by_plate()│  (SQL-backed stores plug in here)
//!   fn save()           │
//! ```

pub mod car_repository;
