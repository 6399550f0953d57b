use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{therapists::TherapistRepository, users::UserRepository},
        value_objects::users::UpdateUserModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{therapists::TherapistPostgres, users::UserPostgres},
    },
};

use crate::{
    auth::AuthUser,
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
        .route(
            "/me",
            get(get_profile).put(update_profile).delete(delete_account),
        )
        .with_state(Arc::new(user_usecase))
}

pub async fn get_profile<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    let profile = user_usecase.get_profile(auth.user_id).await?;
    Ok(api_response::ok(profile))
}

pub async fn update_profile<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    auth: AuthUser,
    payload: Result<Json<UpdateUserModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let changes = model.to_entity()?;
    let profile = user_usecase.update_profile(auth.user_id, changes).await?;

    Ok(api_response::ok_with("Account settings updated", profile))
}

pub async fn delete_account<U, T>(
    State(user_usecase): State<Arc<UserUseCase<U, T>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    U: UserRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
{
    user_usecase.delete_account(auth.user_id).await?;
    Ok(api_response::ok_with("Account deleted", auth.user_id))
}
