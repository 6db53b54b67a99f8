//! Car - The registered vehicle record
//!
//! CarRecord is an Entity: its identity is the `CarId` handed out by the
//! repository when the record is first persisted. Before that point the car
//! only exists as a `NewCar`, which has no identity at all.

/// Identifier assigned by the persistence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(u64);

impl CarId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for CarId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A car that passed validation but has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCar {
    model: String,
    plate: String,
}

impl NewCar {
    pub fn new(model: impl Into<String>, plate: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            plate: plate.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    /// Attach the identity chosen by the repository.
    ///
    /// Only repositories should call this; the id is never predicted by
    /// callers.
    pub fn into_record(self, id: CarId) -> CarRecord {
        CarRecord {
            id,
            model: self.model,
            plate: self.plate,
        }
    }
}

/// A persisted car
///
/// Immutable once created: there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarRecord {
    id: CarId,
    model: String,
    plate: String,
}

impl CarRecord {
    // ========== Getters ==========

    pub fn id(&self) -> CarId {
        self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }
}
