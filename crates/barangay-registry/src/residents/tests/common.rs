use std::sync::Arc;

use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::residents::domain::{NewResident, Resident, ResidentId, ResidentSubmission, UserId};
use crate::residents::query::{ResidentQuery, Visibility};
use crate::residents::repository::{RepositoryError, ResidentRepository};
use crate::residents::{
    resident_router, AccessPolicy, Caller, InMemoryResidentRepository, ResidentRegistryService,
    ROLES_HEADER, USER_ID_HEADER,
};

pub(super) const ENCODER: UserId = UserId(7);
pub(super) const OTHER_ENCODER: UserId = UserId(8);
pub(super) const SECRETARY: UserId = UserId(1);

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

pub(super) fn encoder() -> Caller {
    Caller::new(ENCODER, ["encoder"])
}

pub(super) fn other_encoder() -> Caller {
    Caller::new(OTHER_ENCODER, ["encoder"])
}

pub(super) fn secretary() -> Caller {
    Caller::new(SECRETARY, ["brgySecretary"])
}

pub(super) fn super_admin() -> Caller {
    Caller::new(UserId(2), ["super_admin"])
}

pub(super) fn submission() -> ResidentSubmission {
    ResidentSubmission {
        lastname: Some("dela CRUZ".to_string()),
        firstname: Some("JUAN".to_string()),
        middlename: Some("santos".to_string()),
        birthdate: Some("2000-01-01".to_string()),
        purok: Some("purok 3".to_string()),
        placeofbirth: Some("CEBU city".to_string()),
        sex: Some("Male".to_string()),
        civilstatus: Some("Single".to_string()),
        position_in_family: Some("Son".to_string()),
        citizenship: Some("Filipino".to_string()),
        other_citizenship: None,
        educ_attainment: Some("Graduate".to_string()),
        other_educational_att: None,
        occupation: Some("FARMER".to_string()),
        ofw: Some("No".to_string()),
        pwd: Some("No".to_string()),
    }
}

pub(super) fn senior_woman() -> ResidentSubmission {
    ResidentSubmission {
        lastname: Some("Reyes".to_string()),
        firstname: Some("Lourdes".to_string()),
        middlename: None,
        birthdate: Some("1950-03-15".to_string()),
        sex: Some("Female".to_string()),
        civilstatus: Some("Widowed".to_string()),
        position_in_family: Some("Head of the family".to_string()),
        pwd: Some("Yes".to_string()),
        ..submission()
    }
}

pub(super) fn senior_man() -> ResidentSubmission {
    ResidentSubmission {
        lastname: Some("Garcia".to_string()),
        firstname: Some("Pedro".to_string()),
        birthdate: Some("1960-01-20".to_string()),
        position_in_family: Some("Head of the family".to_string()),
        civilstatus: Some("Married".to_string()),
        ofw: Some("Yes".to_string()),
        ..submission()
    }
}

pub(super) fn build_service() -> (
    ResidentRegistryService<InMemoryResidentRepository>,
    Arc<InMemoryResidentRepository>,
) {
    let repository = Arc::new(InMemoryResidentRepository::default());
    let service = ResidentRegistryService::new(repository.clone(), AccessPolicy::default());
    (service, repository)
}

pub(super) struct UnavailableRepository;

impl ResidentRepository for UnavailableRepository {
    fn insert(&self, _resident: NewResident) -> Result<Resident, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _visibility: &Visibility,
        _resident: Resident,
    ) -> Result<Resident, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _visibility: &Visibility,
        _id: ResidentId,
    ) -> Result<Option<Resident>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(
        &self,
        _visibility: &Visibility,
        _query: &ResidentQuery,
    ) -> Result<Vec<Resident>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_many(
        &self,
        _visibility: &Visibility,
        _ids: &[ResidentId],
    ) -> Result<Vec<ResidentId>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(
    service: ResidentRegistryService<InMemoryResidentRepository>,
) -> axum::Router {
    resident_router(Arc::new(service))
}

pub(super) fn request_as(
    caller: &Caller,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Request<axum::body::Body> {
    let roles: Vec<&str> = caller.roles.iter().map(String::as_str).collect();
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_ID_HEADER, caller.user_id.0.to_string())
        .header(ROLES_HEADER, roles.join(","));

    match body {
        Some(body) => builder
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&body).expect("serialize body"),
            ))
            .expect("request builds"),
        None => builder
            .body(axum::body::Body::empty())
            .expect("request builds"),
    }
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
