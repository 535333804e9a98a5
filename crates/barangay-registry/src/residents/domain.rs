use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Auto-assigned primary key of a resident row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(pub u64);

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the account that encoded a resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed option sets rendered as selects on the intake form.
pub trait Choice: Sized + Copy + 'static {
    const OPTIONS: &'static [Self];

    fn label(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::OPTIONS
            .iter()
            .copied()
            .find(|option| option.label().eq_ignore_ascii_case(raw))
    }
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl Choice for $name {
            const OPTIONS: &'static [Self] = &[$($name::$variant),+];

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }
    };
}

choice_enum!(Sex {
    Male => "Male",
    Female => "Female",
});

choice_enum!(CivilStatus {
    Single => "Single",
    Married => "Married",
    Separated => "Separated",
    Widowed => "Widowed",
});

choice_enum!(
    /// Household role of the resident.
    FamilyPosition {
        Head => "Head of the family",
        Wife => "Wife",
        Son => "Son",
        Daughter => "Daughter",
    }
);

choice_enum!(
    /// `Others` requires a free-text `other_citizenship`.
    Citizenship {
        Filipino => "Filipino",
        Others => "Others",
    }
);

choice_enum!(
    /// `Others` requires a free-text `other_educationalAtt`.
    EducationalAttainment {
        Graduate => "Graduate",
        Others => "Others",
    }
);

choice_enum!(YesNo {
    Yes => "Yes",
    No => "No",
});

impl YesNo {
    pub fn is_yes(self) -> bool {
        matches!(self, YesNo::Yes)
    }
}

/// Birthdate as stored: a calendar date, or the raw text when it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Birthdate {
    Date(NaiveDate),
    Unparsed(String),
}

impl Birthdate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Birthdate::Date(date) => Some(*date),
            Birthdate::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for Birthdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Birthdate::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Birthdate::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Raw form input for creating or editing a resident.
///
/// Every field is optional at this layer so that validation can report all
/// missing fields at once. There is deliberately no `age` field: unknown keys
/// are ignored during deserialization, so a client-supplied age never lands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentSubmission {
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub middlename: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub purok: Option<String>,
    #[serde(default)]
    pub placeofbirth: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub civilstatus: Option<String>,
    #[serde(default, rename = "positioninFamily")]
    pub position_in_family: Option<String>,
    #[serde(default)]
    pub citizenship: Option<String>,
    #[serde(default)]
    pub other_citizenship: Option<String>,
    #[serde(default, rename = "educAttainment")]
    pub educ_attainment: Option<String>,
    #[serde(default, rename = "other_educationalAtt")]
    pub other_educational_att: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub ofw: Option<String>,
    #[serde(default)]
    pub pwd: Option<String>,
}

/// Validated, normalized resident attributes ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentDetails {
    pub lastname: String,
    pub firstname: String,
    pub middlename: Option<String>,
    pub age: Option<u32>,
    pub birthdate: Birthdate,
    pub purok: String,
    pub placeofbirth: String,
    pub sex: Sex,
    pub civilstatus: CivilStatus,
    #[serde(rename = "positioninFamily")]
    pub position_in_family: FamilyPosition,
    pub citizenship: Citizenship,
    pub other_citizenship: Option<String>,
    #[serde(rename = "educAttainment")]
    pub educ_attainment: EducationalAttainment,
    #[serde(rename = "other_educationalAtt")]
    pub other_educational_att: Option<String>,
    pub occupation: String,
    pub ofw: YesNo,
    pub pwd: YesNo,
}

/// Row about to be inserted; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResident {
    pub user_id: UserId,
    pub details: ResidentDetails,
    pub created_at: DateTime<Utc>,
}

/// Persisted resident row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub details: ResidentDetails,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resident {
    pub fn from_new(id: ResidentId, new: NewResident) -> Self {
        Self {
            id,
            user_id: new.user_id,
            details: new.details,
            is_approved: false,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// "First Middle Last", skipping an absent middle name.
    pub fn full_name(&self) -> String {
        let details = &self.details;
        match details.middlename.as_deref() {
            Some(middle) => format!("{} {} {}", details.firstname, middle, details.lastname),
            None => format!("{} {}", details.firstname, details.lastname),
        }
    }

    pub fn is_senior_citizen(&self) -> bool {
        self.details
            .age
            .is_some_and(|age| age >= super::query::SENIOR_CITIZEN_AGE)
    }
}
