use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, put},
};
use crates::{
    domain::{
        repositories::appointments::AppointmentRepository,
        value_objects::appointments::{
            CreateAppointmentModel, UpdateAppointmentModel, UpdateAppointmentStatusModel,
        },
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::appointments::AppointmentPostgres,
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::appointments::AppointmentUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let appointment_repository = AppointmentPostgres::new(Arc::clone(&db_pool));
    let appointment_usecase = AppointmentUseCase::new(Arc::new(appointment_repository));

    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete))
        .route("/:id/status", put(update_status))
        .with_state(Arc::new(appointment_usecase))
}

pub async fn create<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
    payload: Result<Json<CreateAppointmentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let appointment = model.validate()?;
    let created = appointment_usecase.create(&auth, appointment).await?;

    Ok(api_response::created("Appointment created", created))
}

pub async fn list<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    let appointments = appointment_usecase.list(&auth).await?;
    Ok(api_response::ok(appointments))
}

pub async fn get_one<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    let appointment = appointment_usecase.get(&auth, appointment_id).await?;
    Ok(api_response::ok(appointment))
}

pub async fn update<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
    Path(appointment_id): Path<Uuid>,
    payload: Result<Json<UpdateAppointmentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let changes = model.to_entity()?;
    let appointment = appointment_usecase
        .update(&auth, appointment_id, changes)
        .await?;

    Ok(api_response::ok_with("Appointment updated", appointment))
}

pub async fn update_status<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
    Path(appointment_id): Path<Uuid>,
    payload: Result<Json<UpdateAppointmentStatusModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let status = model.validate()?;
    let appointment = appointment_usecase
        .update_status(&auth, appointment_id, status)
        .await?;

    Ok(api_response::ok_with("Appointment status updated", appointment))
}

pub async fn delete<A>(
    State(appointment_usecase): State<Arc<AppointmentUseCase<A>>>,
    auth: AuthUser,
    Path(appointment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    A: AppointmentRepository + Send + Sync + 'static,
{
    appointment_usecase.delete(&auth, appointment_id).await?;
    Ok(api_response::ok_with("Appointment deleted", appointment_id))
}
