use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::access::{AccessPolicy, Caller, RowActions};
use super::derivation::DerivationSoftFailure;
use super::domain::{NewResident, Resident, ResidentId, ResidentSubmission};
use super::query::ResidentQuery;
use super::repository::{RepositoryError, ResidentRepository};
use super::validation::{ResidentValidator, ValidationError};

/// Registry facade composing validation, the visibility scope, and the approval action.
pub struct ResidentRegistryService<R> {
    validator: ResidentValidator,
    repository: Arc<R>,
    access: AccessPolicy,
}

/// A written resident together with any soft derivation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedResident {
    pub resident: Resident,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DerivationSoftFailure>,
}

/// Listed resident with the caller's row actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentRow {
    #[serde(flatten)]
    pub resident: Resident,
    pub full_name: String,
    pub actions: RowActions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    Approved(Resident),
    /// Not offered to this caller for this record; nothing was written.
    Unavailable,
}

impl<R> ResidentRegistryService<R>
where
    R: ResidentRepository + 'static,
{
    pub fn new(repository: Arc<R>, access: AccessPolicy) -> Self {
        Self {
            validator: ResidentValidator::new(),
            repository,
            access,
        }
    }

    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    /// Validate a new submission and store it under the caller's identity.
    pub fn create(
        &self,
        caller: &Caller,
        submission: ResidentSubmission,
        today: NaiveDate,
    ) -> Result<SavedResident, RegistryServiceError> {
        let validated = self.validator.validate_and_normalize(submission, today)?;
        log_soft_failures(None, &validated.soft_failures);

        let resident = self.repository.insert(NewResident {
            user_id: caller.user_id,
            details: validated.details,
            created_at: Utc::now(),
        })?;

        info!(resident_id = %resident.id, user_id = %caller.user_id, "resident created");

        Ok(SavedResident {
            resident,
            warnings: validated.soft_failures,
        })
    }

    /// Re-validate and re-normalize an existing record. Owner and approval state are preserved.
    pub fn update(
        &self,
        caller: &Caller,
        id: ResidentId,
        submission: ResidentSubmission,
        today: NaiveDate,
    ) -> Result<SavedResident, RegistryServiceError> {
        let visibility = self.access.visibility_for(caller);
        let existing = self
            .repository
            .fetch(&visibility, id)?
            .ok_or(RepositoryError::NotFound)?;

        let validated = self.validator.validate_and_normalize(submission, today)?;
        log_soft_failures(Some(id), &validated.soft_failures);

        let resident = self.repository.update(
            &visibility,
            Resident {
                details: validated.details,
                updated_at: Utc::now(),
                ..existing
            },
        )?;

        info!(resident_id = %id, user_id = %caller.user_id, "resident updated");

        Ok(SavedResident {
            resident,
            warnings: validated.soft_failures,
        })
    }

    pub fn get(&self, caller: &Caller, id: ResidentId) -> Result<Resident, RegistryServiceError> {
        let visibility = self.access.visibility_for(caller);
        let resident = self
            .repository
            .fetch(&visibility, id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(resident)
    }

    pub fn list(
        &self,
        caller: &Caller,
        query: &ResidentQuery,
    ) -> Result<Vec<ResidentRow>, RegistryServiceError> {
        let visibility = self.access.visibility_for(caller);
        let rows = self
            .repository
            .list(&visibility, query)?
            .into_iter()
            .map(|resident| ResidentRow {
                full_name: resident.full_name(),
                actions: self.access.row_actions(caller, &resident),
                resident,
            })
            .collect();
        Ok(rows)
    }

    /// Mark a pending record approved. Only elevated callers are offered this.
    pub fn approve(
        &self,
        caller: &Caller,
        id: ResidentId,
    ) -> Result<ApprovalOutcome, RegistryServiceError> {
        if !self.access.is_elevated(caller) {
            debug!(resident_id = %id, user_id = %caller.user_id, "approve not offered to caller");
            return Ok(ApprovalOutcome::Unavailable);
        }

        let visibility = self.access.visibility_for(caller);
        let resident = self
            .repository
            .fetch(&visibility, id)?
            .ok_or(RepositoryError::NotFound)?;

        if !self.access.can_approve(caller, &resident) {
            debug!(resident_id = %id, "resident already approved");
            return Ok(ApprovalOutcome::Unavailable);
        }

        let approved = self.repository.update(
            &visibility,
            Resident {
                is_approved: true,
                updated_at: Utc::now(),
                ..resident
            },
        )?;

        info!(resident_id = %id, user_id = %caller.user_id, "resident approved");
        Ok(ApprovalOutcome::Approved(approved))
    }

    /// Permanently remove the selected records visible to the caller.
    pub fn delete_many(
        &self,
        caller: &Caller,
        ids: &[ResidentId],
    ) -> Result<Vec<ResidentId>, RegistryServiceError> {
        let visibility = self.access.visibility_for(caller);
        let removed = self.repository.delete_many(&visibility, ids)?;
        info!(
            user_id = %caller.user_id,
            requested = ids.len(),
            removed = removed.len(),
            "residents deleted"
        );
        Ok(removed)
    }
}

fn log_soft_failures(id: Option<ResidentId>, failures: &[DerivationSoftFailure]) {
    for failure in failures {
        match id {
            Some(id) => warn!(resident_id = %id, raw = %failure.raw, "{failure}"),
            None => warn!(raw = %failure.raw, "{failure}"),
        }
    }
}

/// Error raised by the registry service.
#[derive(Debug, thiserror::Error)]
pub enum RegistryServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
