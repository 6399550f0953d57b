use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::post,
};
use crates::{
    domain::{
        repositories::{therapists::TherapistRepository, users::UserRepository},
        value_objects::users::{LoginModel, RegisterStudentModel, RegisterTherapistModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{therapists::TherapistPostgres, users::UserPostgres},
    },
};

use crate::{
    axum_http::{api_response, error_responses::AppError},
    config::config_model::UserSecret,
    usecases::users::UserUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, user_secret: Arc<UserSecret>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let therapist_repository = TherapistPostgres::new(Arc::clone(&db_pool));
    let user_usecase = UserUseCase::new(
        Arc::new(user_repository),
        Arc::new(therapist_repository),
        user_secret,
    );

    Router::new()
        .route("/register/student", post(register_student))
        .route("/register/therapist", post(register_therapist))
        .route("/login", post(login))
        .with_state(Arc::new(user_usecase))
}

pub async fn register_student<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    payload: Result<Json<RegisterStudentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let registration = model.validate()?;
    let token = user_usecase.register_student(registration).await?;

    Ok(api_response::created("Student registered", token))
}

pub async fn register_therapist<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    payload: Result<Json<RegisterTherapistModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let registration = model.validate()?;
    let token = user_usecase.register_therapist(registration).await?;

    Ok(api_response::created("Therapist registered", token))
}

pub async fn login<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    payload: Result<Json<LoginModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let (email, password) = model.validate()?;
    let token = user_usecase.login(email, password).await?;

    Ok(api_response::ok_with("Logged in", token))
}
