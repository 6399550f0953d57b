use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, put},
};
use crates::{
    domain::{
        repositories::therapists::TherapistRepository,
        value_objects::therapists::{
            ListTherapistsFilter, UpdateAvailabilityModel, UpdateTherapistModel,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::therapists::TherapistPostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::therapists::TherapistUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let therapist_repository = TherapistPostgres::new(Arc::clone(&db_pool));
    let therapist_usecase = TherapistUseCase::new(Arc::new(therapist_repository));

    Router::new()
        .route("/", get(list))
        .route("/me", put(update_settings))
        .route("/me/availability", put(set_availability))
        .route("/:id", get(get_one))
        .with_state(Arc::new(therapist_usecase))
}

pub async fn list<T>(
    State(therapist_usecase): State<Arc<TherapistUseCase<T>>>,
    _auth: AuthUser,
    Query(filter): Query<ListTherapistsFilter>,
) -> Result<impl IntoResponse, AppError>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    let therapists = therapist_usecase.list(filter).await?;
    Ok(api_response::ok(therapists))
}

pub async fn get_one<T>(
    State(therapist_usecase): State<Arc<TherapistUseCase<T>>>,
    _auth: AuthUser,
    Path(therapist_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    let therapist = therapist_usecase.get(therapist_id).await?;
    Ok(api_response::ok(therapist))
}

pub async fn update_settings<T>(
    State(therapist_usecase): State<Arc<TherapistUseCase<T>>>,
    auth: AuthUser,
    payload: Result<Json<UpdateTherapistModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let changes = model.to_entity()?;
    let therapist = therapist_usecase.update_settings(&auth, changes).await?;

    Ok(api_response::ok_with("Therapist settings updated", therapist))
}

pub async fn set_availability<T>(
    State(therapist_usecase): State<Arc<TherapistUseCase<T>>>,
    auth: AuthUser,
    payload: Result<Json<UpdateAvailabilityModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let available = model.validate()?;
    let therapist = therapist_usecase.set_availability(&auth, available).await?;

    Ok(api_response::ok_with("Availability updated", therapist))
}
