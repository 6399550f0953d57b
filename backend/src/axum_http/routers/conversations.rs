use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, put},
};
use crates::{
    domain::{
        repositories::{
            conversations::ConversationRepository, participants::ParticipantRepository,
            relationships::RelationshipRepository,
        },
        value_objects::conversations::{CreateConversationModel, SendMessageModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            conversations::ConversationPostgres, participants::ParticipantPostgres,
            relationships::RelationshipPostgres,
        },
    },
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::conversations::ConversationUseCase,
};

type SharedUseCase<C, R, P> = State<Arc<ConversationUseCase<C, R, P>>>;

/// Mounted at the api root: messages are addressed both through their
/// conversation and directly by id.
pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let conversation_repository = ConversationPostgres::new(Arc::clone(&db_pool));
    let relationship_repository = RelationshipPostgres::new(Arc::clone(&db_pool));
    let participant_repository = ParticipantPostgres::new(Arc::clone(&db_pool));
    let conversation_usecase = ConversationUseCase::new(
        Arc::new(conversation_repository),
        Arc::new(relationship_repository),
        Arc::new(participant_repository),
    );

    Router::new()
        .route("/conversations", get(list).post(create))
        .route(
            "/conversations/:id/messages",
            get(list_messages).post(send_message),
        )
        .route("/conversations/:id/read", put(mark_conversation_read))
        .route("/messages/:id/read", put(mark_message_read))
        .with_state(Arc::new(conversation_usecase))
}

pub async fn create<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
    payload: Result<Json<CreateConversationModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let (student_id, therapist_id) = model.validate()?;
    let conversation = conversation_usecase
        .create(&auth, student_id, therapist_id)
        .await?;

    Ok(api_response::created("Conversation ready", conversation))
}

pub async fn list<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let conversations = conversation_usecase.list(&auth).await?;
    Ok(api_response::ok(conversations))
}

pub async fn list_messages<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let messages = conversation_usecase
        .list_messages(&auth, conversation_id)
        .await?;
    Ok(api_response::ok(messages))
}

pub async fn send_message<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
    payload: Result<Json<SendMessageModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let content = model.validate()?;
    let message = conversation_usecase
        .send_message(&auth, conversation_id, content)
        .await?;

    Ok(api_response::created("Message sent", message))
}

pub async fn mark_conversation_read<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let updated = conversation_usecase
        .mark_conversation_read(&auth, conversation_id)
        .await?;
    Ok(api_response::ok_with(
        "Conversation marked as read",
        json!({ "updated": updated }),
    ))
}

pub async fn mark_message_read<C, R, P>(
    State(conversation_usecase): SharedUseCase<C, R, P>,
    auth: AuthUser,
    Path(message_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    C: ConversationRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let message = conversation_usecase
        .mark_message_read(&auth, message_id)
        .await?;
    Ok(api_response::ok_with("Message marked as read", message))
}
