//! Barangay resident registry: intake validation, ownership scoping, and approval.
//!
//! Encoders submit residents and only ever see their own rows. Elevated roles see the whole
//! registry and may approve pending records.

pub mod access;
pub(crate) mod derivation;
pub mod domain;
pub mod memory;
pub(crate) mod normalize;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validation;

#[cfg(test)]
mod tests;

pub use access::{AccessPolicy, Caller, RowActions};
pub use derivation::{age_on, parse_birthdate, DerivationSoftFailure};
pub use domain::{
    Birthdate, Choice, CivilStatus, Citizenship, EducationalAttainment, FamilyPosition,
    NewResident, Resident, ResidentDetails, ResidentId, ResidentSubmission, Sex, UserId, YesNo,
};
pub use memory::InMemoryResidentRepository;
pub use normalize::capitalize;
pub use query::{ResidentFilter, ResidentQuery, UnknownFilter, Visibility, SENIOR_CITIZEN_AGE};
pub use repository::{RepositoryError, ResidentRepository};
pub use router::{resident_router, ROLES_HEADER, USER_ID_HEADER};
pub use service::{
    ApprovalOutcome, RegistryServiceError, ResidentRegistryService, ResidentRow, SavedResident,
};
pub use validation::{ResidentValidator, ValidatedResident, ValidationError, MAX_TEXT_LENGTH};
