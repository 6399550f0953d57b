use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            participants::ParticipantRepository, reviews::ReviewRepository,
            therapists::TherapistRepository,
        },
        value_objects::reviews::CreateReviewModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            participants::ParticipantPostgres, reviews::ReviewPostgres,
            therapists::TherapistPostgres,
        },
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::reviews::ReviewUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let review_repository = ReviewPostgres::new(Arc::clone(&db_pool));
    let therapist_repository = TherapistPostgres::new(Arc::clone(&db_pool));
    let participant_repository = ParticipantPostgres::new(Arc::clone(&db_pool));
    let review_usecase = ReviewUseCase::new(
        Arc::new(review_repository),
        Arc::new(therapist_repository),
        Arc::new(participant_repository),
    );

    Router::new()
        .route("/", post(create))
        .route("/therapist/:therapist_id", get(list_for_therapist))
        .with_state(Arc::new(review_usecase))
}

pub async fn create<V, T, P>(
    State(review_usecase): State<Arc<ReviewUseCase<V, T, P>>>,
    auth: AuthUser,
    payload: Result<Json<CreateReviewModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    V: ReviewRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let (therapist_id, rating, review_text) = model.validate()?;
    let review = review_usecase
        .create(&auth, therapist_id, rating, review_text)
        .await?;

    Ok(api_response::created("Review submitted", review))
}

pub async fn list_for_therapist<V, T, P>(
    State(review_usecase): State<Arc<ReviewUseCase<V, T, P>>>,
    _auth: AuthUser,
    Path(therapist_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    V: ReviewRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let reviews = review_usecase.list_for_therapist(therapist_id).await?;
    Ok(api_response::ok(reviews))
}
