use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, put},
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
        .route("/:id", put(update))
        .route("/:id/audits", get(list_audits))
        .with_state(Arc::new(document_usecase))
}

pub async fn update<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
    payload: Result<Json<DocumentContentModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let content = model.validate()?;
    let document = document_usecase
        .update_document(&auth, document_id, content)
        .await?;

    Ok(api_response::ok_with("Document updated", document))
}

pub async fn list_audits<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let audits = document_usecase.list_audits(&auth, document_id).await?;
    Ok(api_response::ok(audits))
}
