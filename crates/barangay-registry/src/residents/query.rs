use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Choice, Resident, Sex, UserId};

/// Residents at or above this age count as senior citizens.
pub const SENIOR_CITIZEN_AGE: u32 = 60;

/// Row-level scope every repository read and write is narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Everything,
    OwnedBy(UserId),
}

impl Visibility {
    pub fn permits(&self, resident: &Resident) -> bool {
        match self {
            Visibility::Everything => true,
            Visibility::OwnedBy(owner) => resident.user_id == *owner,
        }
    }
}

/// Listing filters. Several filters combine as an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidentFilter {
    Male,
    Female,
    PendingApproval,
    Pwd,
    Ofw,
    SeniorCitizens,
    Approved,
}

impl ResidentFilter {
    pub const ALL: [ResidentFilter; 7] = [
        ResidentFilter::Male,
        ResidentFilter::Female,
        ResidentFilter::PendingApproval,
        ResidentFilter::Pwd,
        ResidentFilter::Ofw,
        ResidentFilter::SeniorCitizens,
        ResidentFilter::Approved,
    ];

    /// Query-string key.
    pub const fn key(self) -> &'static str {
        match self {
            ResidentFilter::Male => "male",
            ResidentFilter::Female => "female",
            ResidentFilter::PendingApproval => "pending",
            ResidentFilter::Pwd => "pwd",
            ResidentFilter::Ofw => "ofw",
            ResidentFilter::SeniorCitizens => "senior",
            ResidentFilter::Approved => "approved",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ResidentFilter::Male => "Male",
            ResidentFilter::Female => "Female",
            ResidentFilter::PendingApproval => "Pending Approval",
            ResidentFilter::Pwd => "PWD",
            ResidentFilter::Ofw => "OFW",
            ResidentFilter::SeniorCitizens => "Age 60 and Above",
            ResidentFilter::Approved => "Approved",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.key().eq_ignore_ascii_case(raw))
    }

    pub fn matches(self, resident: &Resident) -> bool {
        let details = &resident.details;
        match self {
            ResidentFilter::Male => details.sex == Sex::Male,
            ResidentFilter::Female => details.sex == Sex::Female,
            ResidentFilter::PendingApproval => !resident.is_approved,
            ResidentFilter::Pwd => details.pwd.is_yes(),
            ResidentFilter::Ofw => details.ofw.is_yes(),
            ResidentFilter::SeniorCitizens => resident.is_senior_citizen(),
            ResidentFilter::Approved => resident.is_approved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resident filter '{0}'")]
pub struct UnknownFilter(pub String);

/// Filters plus free-text search applied on top of the visibility scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentQuery {
    pub filters: BTreeSet<ResidentFilter>,
    pub search: Option<String>,
}

impl ResidentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: ResidentFilter) -> Self {
        self.filters.insert(filter);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term.trim().to_string())
        };
        self
    }

    /// Parse a comma separated list such as `senior,female`.
    pub fn parse_filters(raw: &str) -> Result<BTreeSet<ResidentFilter>, UnknownFilter> {
        raw.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| ResidentFilter::from_key(key).ok_or_else(|| UnknownFilter(key.to_string())))
            .collect()
    }

    pub fn matches(&self, resident: &Resident) -> bool {
        self.filters.iter().all(|filter| filter.matches(resident))
            && self
                .search
                .as_deref()
                .map_or(true, |term| search_matches(resident, term))
    }
}

fn search_matches(resident: &Resident, term: &str) -> bool {
    let needle = term.to_lowercase();
    searchable_columns(resident)
        .iter()
        .any(|column| column.to_lowercase().contains(&needle))
}

fn searchable_columns(resident: &Resident) -> Vec<String> {
    let details = &resident.details;
    vec![
        details.lastname.clone(),
        details.firstname.clone(),
        details.middlename.clone().unwrap_or_default(),
        details.birthdate.to_string(),
        details.age.map(|age| age.to_string()).unwrap_or_default(),
        details.purok.clone(),
        details.placeofbirth.clone(),
        details.sex.label().to_string(),
        details.civilstatus.label().to_string(),
        details.position_in_family.label().to_string(),
        details.citizenship.label().to_string(),
        details.educ_attainment.label().to_string(),
        details.occupation.clone(),
        details.ofw.label().to_string(),
        details.pwd.label().to_string(),
    ]
}
