use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{NewResident, Resident, ResidentId};
use super::query::{ResidentQuery, Visibility};
use super::repository::{RepositoryError, ResidentRepository};

#[derive(Debug, Default)]
struct Table {
    next_id: u64,
    rows: BTreeMap<ResidentId, Resident>,
}

/// Process-local `ResidentRepository` backed by an ordered map. Ids start at 1.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResidentRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryResidentRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Table>, RepositoryError> {
        self.table
            .lock()
            .map_err(|_| RepositoryError::Unavailable("resident table lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResidentRepository for InMemoryResidentRepository {
    fn insert(&self, resident: NewResident) -> Result<Resident, RepositoryError> {
        let mut table = self.lock()?;
        table.next_id += 1;
        let id = ResidentId(table.next_id);
        let row = Resident::from_new(id, resident);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    fn update(
        &self,
        visibility: &Visibility,
        resident: Resident,
    ) -> Result<Resident, RepositoryError> {
        let mut table = self.lock()?;
        match table.rows.get_mut(&resident.id) {
            Some(existing) if visibility.permits(existing) => {
                *existing = resident.clone();
                Ok(resident)
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(
        &self,
        visibility: &Visibility,
        id: ResidentId,
    ) -> Result<Option<Resident>, RepositoryError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .get(&id)
            .filter(|row| visibility.permits(row))
            .cloned())
    }

    fn list(
        &self,
        visibility: &Visibility,
        query: &ResidentQuery,
    ) -> Result<Vec<Resident>, RepositoryError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .values()
            .filter(|row| visibility.permits(row) && query.matches(row))
            .cloned()
            .collect())
    }

    fn delete_many(
        &self,
        visibility: &Visibility,
        ids: &[ResidentId],
    ) -> Result<Vec<ResidentId>, RepositoryError> {
        let mut table = self.lock()?;
        let mut removed = Vec::new();
        for id in ids {
            let permitted = table
                .rows
                .get(id)
                .is_some_and(|row| visibility.permits(row));
            if permitted && table.rows.remove(id).is_some() {
                removed.push(*id);
            }
        }
        Ok(removed)
    }
}
