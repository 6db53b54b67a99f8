//! Car Repository - Abstract persistence for CarRecords
//!
//! This trait defines what the registration flow needs from storage.
//! Whether the records live in memory, SQLite or PostgreSQL is the
//! adapter's concern.

use crate::model::car::{CarId, CarRecord, NewCar};

/// Errors that can occur during repository operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The storage-level unique constraint on `plate` rejected a write
    UniquePlateViolation { plate: String },
    /// Failed to read or persist
    PersistenceError { message: String },
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::UniquePlateViolation { plate } => {
                write!(f, "Unique constraint violated for plate: {}", plate)
            }
            RepositoryError::PersistenceError { message } => {
                write!(f, "Persistence error: {}", message)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Car Repository Trait
///
/// This is a PORT in hexagonal architecture.
///
/// Methods take `&self` so a single repository can be shared by concurrent
/// callers; implementations synchronize internally. Every implementation
/// MUST enforce plate uniqueness inside `save` itself: callers may check
/// `exists_by_plate` first, but that check races with other writers.
pub trait CarRepository: Send + Sync {
    /// Check whether a record with exactly this plate exists (case-sensitive)
    fn exists_by_plate(&self, plate: &str) -> Result<bool, RepositoryError>;

    /// Persist a new car and return it with its assigned id.
    ///
    /// Fails with `UniquePlateViolation` if the plate is already taken.
    fn save(&self, car: NewCar) -> Result<CarRecord, RepositoryError>;

    /// Find a record by id
    fn find_by_id(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError>;

    /// Check if a record exists
    fn exists_by_id(&self, id: CarId) -> Result<bool, RepositoryError> {
        Ok(self.find_by_id(id)?.is_some())
    }

    /// Count all records
    fn count(&self) -> Result<usize, RepositoryError>;

    /// Remove every record (test and setup support)
    fn delete_all(&self) -> Result<(), RepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Minimal repository backed by a Vec, used to exercise the default methods
    struct VecCarRepo {
        cars: Mutex<Vec<CarRecord>>,
    }

    struct CountingLookups {
        inner: VecCarRepo,
        lookups: AtomicUsize,
    }

    impl VecCarRepo {
        fn new() -> Self {
            Self {
                cars: Mutex::new(Vec::new()),
            }
        }
    }

    impl CarRepository for VecCarRepo {
        fn exists_by_plate(&self, plate: &str) -> Result<bool, RepositoryError> {
            Ok(self.cars.lock().unwrap().iter().any(|c| c.plate() == plate))
        }

        fn save(&self, car: NewCar) -> Result<CarRecord, RepositoryError> {
            let mut cars = self.cars.lock().unwrap();
            if cars.iter().any(|c| c.plate() == car.plate()) {
                return Err(RepositoryError::UniquePlateViolation {
                    plate: car.plate().to_string(),
                });
            }
            let record = car.into_record(CarId::new(cars.len() as u64 + 1));
            cars.push(record.clone());
            Ok(record)
        }

        fn find_by_id(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
            Ok(self.cars.lock().unwrap().iter().find(|c| c.id() == id).cloned())
        }

        fn count(&self) -> Result<usize, RepositoryError> {
            Ok(self.cars.lock().unwrap().len())
        }

        fn delete_all(&self) -> Result<(), RepositoryError> {
            self.cars.lock().unwrap().clear();
            Ok(())
        }
    }

    impl CarRepository for CountingLookups {
        fn exists_by_plate(&self, plate: &str) -> Result<bool, RepositoryError> {
            self.inner.exists_by_plate(plate)
        }

        fn save(&self, car: NewCar) -> Result<CarRecord, RepositoryError> {
            self.inner.save(car)
        }

        fn find_by_id(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id)
        }

        fn count(&self) -> Result<usize, RepositoryError> {
            self.inner.count()
        }

        fn delete_all(&self) -> Result<(), RepositoryError> {
            self.inner.delete_all()
        }
    }

    #[test]
    fn test_exists_by_id_defaults_to_find_by_id() {
        let repo = CountingLookups {
            inner: VecCarRepo::new(),
            lookups: AtomicUsize::new(0),
        };

        let saved = repo.save(NewCar::new("Gol", "HPX-1234")).unwrap();

        assert!(repo.exists_by_id(saved.id()).unwrap());
        assert!(!repo.exists_by_id(CarId::new(999)).unwrap());
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_save_rejects_duplicate_plate() {
        let repo = VecCarRepo::new();
        repo.save(NewCar::new("Palio", "OIP-9876")).unwrap();

        let err = repo.save(NewCar::new("Ferrari", "OIP-9876")).unwrap_err();

        assert_eq!(
            err,
            RepositoryError::UniquePlateViolation {
                plate: "OIP-9876".to_string()
            }
        );
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = RepositoryError::PersistenceError {
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Persistence error: disk full");

        let err = RepositoryError::UniquePlateViolation {
            plate: "ABC-0001".to_string(),
        };
        assert!(err.to_string().contains("ABC-0001"));
    }
}
