use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::access::Caller;
use super::domain::{ResidentId, ResidentSubmission, UserId};
use super::query::ResidentQuery;
use super::repository::{RepositoryError, ResidentRepository};
use super::service::{ApprovalOutcome, RegistryServiceError, ResidentRegistryService};

/// Header carrying the authenticated user id, set by the auth gateway.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's comma separated role names.
pub const ROLES_HEADER: &str = "x-user-roles";

/// Router builder exposing the resident registry endpoints.
pub fn resident_router<R>(service: Arc<ResidentRegistryService<R>>) -> Router
where
    R: ResidentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/residents",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/residents/bulk-delete",
            post(bulk_delete_handler::<R>),
        )
        .route(
            "/api/v1/residents/:resident_id",
            get(detail_handler::<R>).put(update_handler::<R>),
        )
        .route(
            "/api/v1/residents/:resident_id/approve",
            post(approve_handler::<R>),
        )
        .with_state(service)
}

/// Rejection for requests that arrive without a usable identity.
#[derive(Debug)]
pub struct MissingCaller;

impl IntoResponse for MissingCaller {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": format!("missing or invalid {USER_ID_HEADER} header"),
        });
        (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
    }
}

impl Caller {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let user_id = headers
            .get(USER_ID_HEADER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()?;

        let roles = headers
            .get(ROLES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|role| !role.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Some(Caller::new(UserId(user_id), roles))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = MissingCaller;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Caller::from_headers(&parts.headers).ok_or(MissingCaller)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    #[serde(default)]
    pub(crate) filter: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    pub(crate) ids: Vec<ResidentId>,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Json(submission): Json<ResidentSubmission>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.create(&caller, submission, today) {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    let filters = match params.filter.as_deref().map(ResidentQuery::parse_filters) {
        Some(Ok(filters)) => filters,
        Some(Err(unknown)) => {
            let payload = json!({ "error": unknown.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
        None => Default::default(),
    };

    let mut query = ResidentQuery {
        filters,
        search: None,
    };
    if let Some(term) = params.search {
        query = query.with_search(term);
    }

    match service.list(&caller, &query) {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Path(resident_id): Path<u64>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    match service.get(&caller, ResidentId(resident_id)) {
        Ok(resident) => (StatusCode::OK, Json(resident)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Path(resident_id): Path<u64>,
    Json(submission): Json<ResidentSubmission>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.update(&caller, ResidentId(resident_id), submission, today) {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Path(resident_id): Path<u64>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    match service.approve(&caller, ResidentId(resident_id)) {
        Ok(ApprovalOutcome::Approved(resident)) => (StatusCode::OK, Json(resident)).into_response(),
        Ok(ApprovalOutcome::Unavailable) => {
            let payload = json!({ "error": "approve action unavailable" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn bulk_delete_handler<R>(
    State(service): State<Arc<ResidentRegistryService<R>>>,
    caller: Caller,
    Json(request): Json<BulkDeleteRequest>,
) -> Response
where
    R: ResidentRepository + 'static,
{
    match service.delete_many(&caller, &request.ids) {
        Ok(removed) => (StatusCode::OK, Json(json!({ "deleted": removed }))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: RegistryServiceError) -> Response {
    match err {
        RegistryServiceError::Validation(validation) => {
            let payload = json!({
                "error": validation.to_string(),
                "fields": validation.fields(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        RegistryServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "resident not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
