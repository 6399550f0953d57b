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
        value_objects::documents::CreateSurveyModel,
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
        .route("/student/:student_id", get(list_for_student))
        .with_state(Arc::new(document_usecase))
}

pub async fn create<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    payload: Result<Json<CreateSurveyModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let (survey_type, content) = model.validate()?;
    let survey = document_usecase
        .create_survey(&auth, survey_type, content)
        .await?;

    Ok(api_response::created("Survey submitted", survey))
}

pub async fn list<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let surveys = document_usecase.list_surveys(&auth).await?;
    Ok(api_response::ok(surveys))
}

pub async fn list_for_student<D, R>(
    State(document_usecase): State<Arc<DocumentUseCase<D, R>>>,
    auth: AuthUser,
    Path(student_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    let surveys = document_usecase
        .list_student_surveys(&auth, student_id)
        .await?;
    Ok(api_response::ok(surveys))
}
