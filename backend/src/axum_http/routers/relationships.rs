use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, post, put},
};
use crates::{
    domain::{
        repositories::{
            participants::ParticipantRepository, relationships::RelationshipRepository,
            therapists::TherapistRepository,
        },
        value_objects::relationships::{CreateRelationshipModel, RequestSwitchModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            participants::ParticipantPostgres, relationships::RelationshipPostgres,
            therapists::TherapistPostgres,
        },
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::relationships::RelationshipUseCase,
};

type SharedUseCase<R, T, P> = State<Arc<RelationshipUseCase<R, T, P>>>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let relationship_repository = RelationshipPostgres::new(Arc::clone(&db_pool));
    let therapist_repository = TherapistPostgres::new(Arc::clone(&db_pool));
    let participant_repository = ParticipantPostgres::new(Arc::clone(&db_pool));
    let relationship_usecase = RelationshipUseCase::new(
        Arc::new(relationship_repository),
        Arc::new(therapist_repository),
        Arc::new(participant_repository),
    );

    Router::new()
        .route("/", post(assign))
        .route("/therapist/:therapist_id", get(list_for_therapist))
        .route("/:student_id", get(get_one).delete(end))
        .route("/:student_id/request-switch", put(request_switch))
        .route("/:student_id/approve-switch", put(approve_switch))
        .route("/:student_id/reject-switch", put(reject_switch))
        .with_state(Arc::new(relationship_usecase))
}

pub async fn assign<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    payload: Result<Json<CreateRelationshipModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let (student_id, therapist_id) = model.validate()?;
    let relationship = relationship_usecase
        .assign(&auth, student_id, therapist_id)
        .await?;

    Ok(api_response::created("Therapist assigned", relationship))
}

pub async fn get_one<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let relationship = relationship_usecase.get(&auth, student_id).await?;
    Ok(api_response::ok(relationship))
}

pub async fn list_for_therapist<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(therapist_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let relationships = relationship_usecase
        .list_for_therapist(&auth, therapist_id)
        .await?;
    Ok(api_response::ok(relationships))
}

pub async fn request_switch<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
    payload: Result<Json<RequestSwitchModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let requested_therapist_id = model.validate()?;
    let relationship = relationship_usecase
        .request_switch(&auth, student_id, requested_therapist_id)
        .await?;

    Ok(api_response::ok_with("Switch requested", relationship))
}

pub async fn approve_switch<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let relationship = relationship_usecase
        .approve_switch(&auth, student_id)
        .await?;
    Ok(api_response::ok_with("Switch approved", relationship))
}

pub async fn reject_switch<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let relationship = relationship_usecase.reject_switch(&auth, student_id).await?;
    Ok(api_response::ok_with("Switch rejected", relationship))
}

pub async fn end<R, T, P>(
    State(relationship_usecase): SharedUseCase<R, T, P>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    R: RelationshipRepository + Send + Sync + 'static,
    T: TherapistRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let relationship = relationship_usecase.end(&auth, student_id).await?;
    Ok(api_response::ok_with("Relationship ended", relationship))
}
