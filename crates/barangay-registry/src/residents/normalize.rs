use super::domain::ResidentDetails;

/// Uppercase the first character and lowercase the rest: `"dela CRUZ"` becomes `"Dela cruz"`.
pub fn capitalize(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Applied to every resident right before it is written.
pub fn normalize_details(details: &mut ResidentDetails) {
    details.lastname = capitalize(&details.lastname);
    details.firstname = capitalize(&details.firstname);
    details.middlename = details.middlename.as_deref().map(capitalize);
    details.placeofbirth = capitalize(&details.placeofbirth);
    details.purok = capitalize(&details.purok);
    details.occupation = capitalize(&details.occupation);
}
