use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::derivation::{derive_age, DerivationSoftFailure};
use super::domain::{
    Choice, CivilStatus, Citizenship, EducationalAttainment, FamilyPosition, ResidentDetails,
    ResidentSubmission, Sex, YesNo,
};
use super::normalize::normalize_details;

/// Column width of every text field in `brgy_inhabitants`.
pub const MAX_TEXT_LENGTH: usize = 255;

/// Field-keyed messages for a submission that cannot be written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationError {
    pub fn fields(&self) -> &BTreeMap<&'static str, Vec<String>> {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn push(&mut self, field: &'static str, message: String) {
        self.fields.entry(field).or_default().push(message);
    }

    fn required(&mut self, field: &'static str) {
        self.push(field, format!("The {field} field is required."));
    }

    fn invalid_choice(&mut self, field: &'static str) {
        self.push(field, format!("The selected {field} is invalid."));
    }

    fn too_long(&mut self, field: &'static str) {
        self.push(
            field,
            format!("The {field} field must not be greater than {MAX_TEXT_LENGTH} characters."),
        );
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.fields.keys().copied().collect();
        write!(f, "resident submission is invalid: {}", keys.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Outcome of a successful validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedResident {
    pub details: ResidentDetails,
    pub soft_failures: Vec<DerivationSoftFailure>,
}

/// Turns raw submissions into normalized resident attributes.
#[derive(Debug, Clone, Default)]
pub struct ResidentValidator;

impl ResidentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check required and conditional fields, derive age against `reference_date`, then normalize.
    ///
    /// Structural problems are collected across all fields and fail the whole submission. An
    /// unparseable birthdate does not: the record passes with no age and a soft failure.
    pub fn validate_and_normalize(
        &self,
        submission: ResidentSubmission,
        reference_date: NaiveDate,
    ) -> Result<ValidatedResident, ValidationError> {
        let mut errors = ValidationError::default();

        let lastname = required_text(&mut errors, "lastname", submission.lastname);
        let firstname = required_text(&mut errors, "firstname", submission.firstname);
        let middlename = optional_text(&mut errors, "middlename", submission.middlename);
        let birthdate = required_text(&mut errors, "birthdate", submission.birthdate);
        let purok = required_text(&mut errors, "purok", submission.purok);
        let placeofbirth = required_text(&mut errors, "placeofbirth", submission.placeofbirth);
        let sex = required_choice::<Sex>(&mut errors, "sex", submission.sex);
        let civilstatus =
            required_choice::<CivilStatus>(&mut errors, "civilstatus", submission.civilstatus);
        let position_in_family = required_choice::<FamilyPosition>(
            &mut errors,
            "positioninFamily",
            submission.position_in_family,
        );
        let citizenship =
            required_choice::<Citizenship>(&mut errors, "citizenship", submission.citizenship);
        let other_citizenship = match citizenship {
            Some(Citizenship::Others) => {
                required_text(&mut errors, "other_citizenship", submission.other_citizenship)
            }
            _ => None,
        };
        let educ_attainment = required_choice::<EducationalAttainment>(
            &mut errors,
            "educAttainment",
            submission.educ_attainment,
        );
        let other_educational_att = match educ_attainment {
            Some(EducationalAttainment::Others) => required_text(
                &mut errors,
                "other_educationalAtt",
                submission.other_educational_att,
            ),
            _ => None,
        };
        let occupation = required_text(&mut errors, "occupation", submission.occupation);
        let ofw = required_choice::<YesNo>(&mut errors, "ofw", submission.ofw);
        let pwd = required_choice::<YesNo>(&mut errors, "pwd", submission.pwd);

        let (
            Some(lastname),
            Some(firstname),
            Some(birthdate),
            Some(purok),
            Some(placeofbirth),
            Some(sex),
            Some(civilstatus),
            Some(position_in_family),
            Some(citizenship),
            Some(educ_attainment),
            Some(occupation),
            Some(ofw),
            Some(pwd),
        ) = (
            lastname,
            firstname,
            birthdate,
            purok,
            placeofbirth,
            sex,
            civilstatus,
            position_in_family,
            citizenship,
            educ_attainment,
            occupation,
            ofw,
            pwd,
        )
        else {
            return Err(errors);
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let (birthdate, age, soft_failure) = derive_age(&birthdate, reference_date);

        let mut details = ResidentDetails {
            lastname,
            firstname,
            middlename,
            age,
            birthdate,
            purok,
            placeofbirth,
            sex,
            civilstatus,
            position_in_family,
            citizenship,
            other_citizenship,
            educ_attainment,
            other_educational_att,
            occupation,
            ofw,
            pwd,
        };
        normalize_details(&mut details);

        Ok(ValidatedResident {
            details,
            soft_failures: soft_failure.into_iter().collect(),
        })
    }
}

fn optional_text(
    errors: &mut ValidationError,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        errors.too_long(field);
        return None;
    }
    Some(trimmed.to_string())
}

fn required_text(
    errors: &mut ValidationError,
    field: &'static str,
    value: Option<String>,
) -> Option<String> {
    let blank = value.as_deref().map_or(true, |raw| raw.trim().is_empty());
    if blank {
        errors.required(field);
        return None;
    }
    optional_text(errors, field, value)
}

fn required_choice<T: Choice>(
    errors: &mut ValidationError,
    field: &'static str,
    value: Option<String>,
) -> Option<T> {
    match value.as_deref().map(str::trim) {
        None | Some("") => {
            errors.required(field);
            None
        }
        Some(raw) => {
            let parsed = T::parse(raw);
            if parsed.is_none() {
                errors.invalid_choice(field);
            }
            parsed
        }
    }
}
