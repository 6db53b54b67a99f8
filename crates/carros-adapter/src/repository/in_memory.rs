//! In-Memory Repository Implementation
//!
//! Keeps records in process memory. Ids come from an identity counter that
//! starts at 1 and is never reused, not even after `delete_all`.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use carros_domain::model::car::{CarId, CarRecord, NewCar};
use carros_domain::repository::car_repository::{CarRepository, RepositoryError};

#[derive(Debug)]
struct CarTable {
    rows: BTreeMap<CarId, CarRecord>,
    /// Unique index on plate
    plates: HashMap<String, CarId>,
    next_id: u64,
}

impl Default for CarTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            plates: HashMap::new(),
            next_id: 1,
        }
    }
}

/// In-memory Car Repository
///
/// Thread-safe implementation using RwLock. Clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCarRepository {
    table: Arc<RwLock<CarTable>>,
}

impl InMemoryCarRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CarTable>, RepositoryError> {
        self.table.read().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire read lock".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CarTable>, RepositoryError> {
        self.table.write().map_err(|_| RepositoryError::PersistenceError {
            message: "Failed to acquire write lock".to_string(),
        })
    }
}

impl CarRepository for InMemoryCarRepository {
    fn exists_by_plate(&self, plate: &str) -> Result<bool, RepositoryError> {
        Ok(self.read()?.plates.contains_key(plate))
    }

    fn save(&self, car: NewCar) -> Result<CarRecord, RepositoryError> {
        let mut table = self.write()?;

        // Unique constraint, checked under the same lock as the insert.
        if table.plates.contains_key(car.plate()) {
            return Err(RepositoryError::UniquePlateViolation {
                plate: car.plate().to_string(),
            });
        }

        let id = CarId::new(table.next_id);
        table.next_id += 1;

        let record = car.into_record(id);
        table.plates.insert(record.plate().to_string(), id);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    fn find_by_id(&self, id: CarId) -> Result<Option<CarRecord>, RepositoryError> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.rows.len())
    }

    fn delete_all(&self) -> Result<(), RepositoryError> {
        let mut table = self.write()?;
        table.rows.clear();
        table.plates.clear();
        Ok(())
    }
}
