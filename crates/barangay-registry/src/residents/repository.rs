use super::domain::{NewResident, Resident, ResidentId};
use super::query::{ResidentQuery, Visibility};

/// Storage abstraction for `brgy_inhabitants`.
///
/// Every read and write takes the caller's [`Visibility`]; rows outside it behave as if they
/// did not exist.
pub trait ResidentRepository: Send + Sync {
    fn insert(&self, resident: NewResident) -> Result<Resident, RepositoryError>;
    fn update(&self, visibility: &Visibility, resident: Resident)
        -> Result<Resident, RepositoryError>;
    fn fetch(
        &self,
        visibility: &Visibility,
        id: ResidentId,
    ) -> Result<Option<Resident>, RepositoryError>;
    fn list(
        &self,
        visibility: &Visibility,
        query: &ResidentQuery,
    ) -> Result<Vec<Resident>, RepositoryError>;
    /// Hard delete. Returns the ids that were actually removed.
    fn delete_many(
        &self,
        visibility: &Visibility,
        ids: &[ResidentId],
    ) -> Result<Vec<ResidentId>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("resident not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
