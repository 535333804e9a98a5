//! End-to-end scenarios for resident intake, scoping, and approval through the public facade.

mod common {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use barangay_registry::residents::{
        AccessPolicy, Caller, InMemoryResidentRepository, ResidentRegistryService,
        ResidentSubmission, UserId,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
    }

    pub(super) fn encoder(id: u64) -> Caller {
        Caller::new(UserId(id), ["encoder"])
    }

    pub(super) fn secretary() -> Caller {
        Caller::new(UserId(1), ["brgySecretary"])
    }

    pub(super) fn resident(lastname: &str, birthdate: &str, sex: &str) -> ResidentSubmission {
        ResidentSubmission {
            lastname: Some(lastname.to_string()),
            firstname: Some("maria".to_string()),
            middlename: None,
            birthdate: Some(birthdate.to_string()),
            purok: Some("Purok 1".to_string()),
            placeofbirth: Some("tagbilaran".to_string()),
            sex: Some(sex.to_string()),
            civilstatus: Some("Married".to_string()),
            position_in_family: Some("Wife".to_string()),
            citizenship: Some("Filipino".to_string()),
            other_citizenship: None,
            educ_attainment: Some("Graduate".to_string()),
            other_educational_att: None,
            occupation: Some("vendor".to_string()),
            ofw: Some("No".to_string()),
            pwd: Some("No".to_string()),
        }
    }

    pub(super) fn build_service() -> ResidentRegistryService<InMemoryResidentRepository> {
        ResidentRegistryService::new(
            Arc::new(InMemoryResidentRepository::default()),
            AccessPolicy::default(),
        )
    }
}

mod intake {
    use super::common::*;
    use barangay_registry::residents::RegistryServiceError;

    #[test]
    fn example_birthdate_yields_age_24() {
        let service = build_service();
        let saved = service
            .create(&encoder(10), resident("SANTOS", "2000-01-01", "Female"), today())
            .expect("create");
        assert_eq!(saved.resident.details.age, Some(24));
        assert_eq!(saved.resident.details.lastname, "Santos");
        assert_eq!(saved.resident.full_name(), "Maria Santos");
    }

    #[test]
    fn others_without_override_is_rejected() {
        let service = build_service();
        let mut input = resident("Lim", "1980-05-05", "Male");
        input.citizenship = Some("Others".to_string());
        input.other_citizenship = Some(String::new());

        match service.create(&encoder(10), input, today()) {
            Err(RegistryServiceError::Validation(error)) => {
                assert!(error.has_field("other_citizenship"));
                assert_eq!(error.fields().len(), 1);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

mod scoping {
    use super::common::*;
    use barangay_registry::residents::{
        ApprovalOutcome, RegistryServiceError, RepositoryError, ResidentFilter, ResidentQuery,
    };

    #[test]
    fn encoders_never_see_each_others_records() {
        let service = build_service();
        let first = service
            .create(&encoder(10), resident("Uno", "1990-01-01", "Male"), today())
            .expect("create")
            .resident;
        let second = service
            .create(&encoder(11), resident("Dos", "1991-01-01", "Female"), today())
            .expect("create")
            .resident;

        let listing = service
            .list(&encoder(10), &ResidentQuery::new())
            .expect("list");
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].resident.id, first.id);

        assert!(matches!(
            service.get(&encoder(10), second.id),
            Err(RegistryServiceError::Repository(RepositoryError::NotFound))
        ));
        assert!(matches!(
            service.delete_many(&encoder(10), &[second.id]),
            Ok(removed) if removed.is_empty()
        ));
    }

    #[test]
    fn secretary_approves_pending_records_and_filters_them() {
        let service = build_service();
        let senior = service
            .create(&encoder(10), resident("Tres", "1950-01-01", "Female"), today())
            .expect("create")
            .resident;
        service
            .create(&encoder(11), resident("Cuatro", "1955-01-01", "Male"), today())
            .expect("create");

        assert_eq!(
            service.approve(&encoder(10), senior.id).expect("no error"),
            ApprovalOutcome::Unavailable
        );
        assert!(matches!(
            service.approve(&secretary(), senior.id).expect("approve"),
            ApprovalOutcome::Approved(ref resident) if resident.is_approved
        ));

        let senior_women = service
            .list(
                &secretary(),
                &ResidentQuery::new()
                    .with_filter(ResidentFilter::SeniorCitizens)
                    .with_filter(ResidentFilter::Female),
            )
            .expect("list");
        assert_eq!(senior_women.len(), 1);
        assert!(!senior_women[0].actions.approve);

        let pending = service
            .list(
                &secretary(),
                &ResidentQuery::new().with_filter(ResidentFilter::PendingApproval),
            )
            .expect("list");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].resident.details.lastname, "Cuatro");
    }
}
