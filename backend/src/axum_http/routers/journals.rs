use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{documents::DocumentRepository, relationships::RelationshipRepository},
        value_objects::documents::DocumentContentModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{documents::DocumentPostgres, relationships::RelationshipPostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::documents::DocumentUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let document_repository = DocumentPostgres::new(Arc::clone(&db_pool));
    let relationship_repository = RelationshipPostgres::new(Arc::clone(&db_pool));
    let document_usecase = DocumentUseCase::new(
        Arc::new(document_repository),
        Arc::new(relationship_repository),
    );

    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete))
        .with_state(Arc::new(document_usecase))
}

pub async fn create<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    payload: Result<Json<DocumentContentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let content = model.validate()?;
    let journal = document_usecase.create_journal(&auth, content).await?;

    Ok(api_response::created("Journal created", journal))
}

pub async fn list<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let journals = document_usecase.list_journals(&auth).await?;
    Ok(api_response::ok(journals))
}

pub async fn get_one<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(journal_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let journal = document_usecase.get_journal(&auth, journal_id).await?;
    Ok(api_response::ok(journal))
}

pub async fn update<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(journal_id): Path<Uuid>,
    payload: Result<Json<DocumentContentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let content = model.validate()?;
    let journal = document_usecase
        .update_journal(&auth, journal_id, content)
        .await?;

    Ok(api_response::ok_with("Journal updated", journal))
}

pub async fn delete<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(journal_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    document_usecase.delete_journal(&auth, journal_id).await?;
    Ok(api_response::ok_with("Journal deleted", journal_id))
}
