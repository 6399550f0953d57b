use std::sync::Arc;

use crates::domain::{
    entities::documents::{DocumentEntity, InsertDocumentEntity},
    repositories::{documents::DocumentRepository, relationships::RelationshipRepository},
    value_objects::{
        documents::{DocumentAuditModel, DocumentModel, SurveyModel},
        enums::{document_types::DocumentType, relationship_statuses::RelationshipStatus},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

/// Journals, surveys and the audited document update they share.
pub struct DocumentUseCase<D, R>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    document_repo: Arc<D>,
    relationship_repo: Arc<R>,
}

impl<D, R> DocumentUseCase<D, R>
where
    D: DocumentRepository + Send + Sync + 'static,
    R: RelationshipRepository + Send + Sync + 'static,
{
    pub fn new(document_repo: Arc<D>, relationship_repo: Arc<R>) -> Self {
        Self {
            document_repo,
            relationship_repo,
        }
    }

    pub async fn create_journal(
        &self,
        caller: &AuthUser,
        content: serde_json::Value,
    ) -> UseCaseResult<DocumentModel> {
        let user_id = caller.user_id;
        let document = self
            .document_repo
            .create_document(InsertDocumentEntity {
                user_id,
                document_type: DocumentType::Journal.to_string(),
                document_content: content,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "documents: failed to create journal");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, document_id = %document.id, "documents: journal created");
        Ok(DocumentModel::from(document))
    }

    pub async fn list_journals(&self, caller: &AuthUser) -> UseCaseResult<Vec<DocumentModel>> {
        let user_id = caller.user_id;
        let documents = self
            .document_repo
            .list_documents(user_id, DocumentType::Journal.to_string())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "documents: failed to list journals");
                UseCaseError::Internal(err)
            })?;

        Ok(documents.into_iter().map(DocumentModel::from).collect())
    }

    pub async fn get_journal(&self, caller: &AuthUser, journal_id: Uuid) -> UseCaseResult<DocumentModel> {
        self.load_journal(caller, journal_id)
            .await
            .map(DocumentModel::from)
    }

    pub async fn update_journal(
        &self,
        caller: &AuthUser,
        journal_id: Uuid,
        content: serde_json::Value,
    ) -> UseCaseResult<DocumentModel> {
        self.load_journal(caller, journal_id).await?;
        self.write_with_audit(caller, journal_id, content).await
    }

    pub async fn delete_journal(&self, caller: &AuthUser, journal_id: Uuid) -> UseCaseResult<()> {
        self.load_journal(caller, journal_id).await?;

        let deleted = self
            .document_repo
            .delete_document(journal_id)
            .await
            .map_err(|err| {
                error!(%journal_id, db_error = ?err, "documents: failed to delete journal");
                UseCaseError::Internal(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("journal not found".to_string()));
        }

        Ok(())
    }

    /// Replaces the content of any document the caller owns and records one
    /// audit entry with the old and new content.
    pub async fn update_document(
        &self,
        caller: &AuthUser,
        document_id: Uuid,
        content: serde_json::Value,
    ) -> UseCaseResult<DocumentModel> {
        self.load_owned(caller, document_id).await?;
        self.write_with_audit(caller, document_id, content).await
    }

    pub async fn list_audits(
        &self,
        caller: &AuthUser,
        document_id: Uuid,
    ) -> UseCaseResult<Vec<DocumentAuditModel>> {
        self.load_owned(caller, document_id).await?;

        let audits = self
            .document_repo
            .list_audits(document_id)
            .await
            .map_err(|err| {
                error!(%document_id, db_error = ?err, "documents: failed to list audits");
                UseCaseError::Internal(err)
            })?;

        Ok(audits.into_iter().map(DocumentAuditModel::from).collect())
    }

    pub async fn create_survey(
        &self,
        caller: &AuthUser,
        survey_type: DocumentType,
        content: serde_json::Value,
    ) -> UseCaseResult<SurveyModel> {
        let user_id = caller.user_id;
        let created = self
            .document_repo
            .create_survey(InsertDocumentEntity {
                user_id,
                document_type: survey_type.to_string(),
                document_content: content,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "documents: failed to create survey");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, survey_id = %created.0.id, %survey_type, "documents: survey created");
        Ok(SurveyModel::from(created))
    }

    pub async fn list_surveys(&self, caller: &AuthUser) -> UseCaseResult<Vec<SurveyModel>> {
        self.surveys_of(caller.user_id).await
    }

    /// A student's surveys, readable by the student and their current therapist.
    pub async fn list_student_surveys(
        &self,
        caller: &AuthUser,
        student_id: Uuid,
    ) -> UseCaseResult<Vec<SurveyModel>> {
        if caller.user_id != student_id {
            let relationship = self
                .relationship_repo
                .find_by_student(student_id)
                .await
                .map_err(|err| {
                    error!(%student_id, db_error = ?err, "documents: failed to load relationship");
                    UseCaseError::Internal(err)
                })?;

            let is_current_therapist = relationship.is_some_and(|row| {
                RelationshipStatus::from_str(&row.status).is_live()
                    && row.current_therapist_id == Some(caller.user_id)
            });
            if !is_current_therapist {
                warn!(%student_id, caller = %caller.user_id, "documents: survey access denied");
                return Err(UseCaseError::Forbidden(
                    "only the student or their current therapist can read these surveys"
                        .to_string(),
                ));
            }
        }

        self.surveys_of(student_id).await
    }

    async fn surveys_of(&self, user_id: Uuid) -> UseCaseResult<Vec<SurveyModel>> {
        let surveys = self
            .document_repo
            .list_surveys(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "documents: failed to list surveys");
                UseCaseError::Internal(err)
            })?;

        Ok(surveys.into_iter().map(SurveyModel::from).collect())
    }

    async fn write_with_audit(
        &self,
        caller: &AuthUser,
        document_id: Uuid,
        content: serde_json::Value,
    ) -> UseCaseResult<DocumentModel> {
        let (document, audit) = self
            .document_repo
            .update_document_with_audit(document_id, caller.user_id, content)
            .await
            .map_err(|err| {
                error!(%document_id, db_error = ?err, "documents: failed to update document");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("document not found".to_string()))?;

        info!(%document_id, audit_id = %audit.id, "documents: document updated");
        Ok(DocumentModel::from(document))
    }

    async fn load_owned(&self, caller: &AuthUser, document_id: Uuid) -> UseCaseResult<DocumentEntity> {
        let document = self
            .document_repo
            .find_document(document_id)
            .await
            .map_err(|err| {
                error!(%document_id, db_error = ?err, "documents: failed to load document");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("document not found".to_string()))?;

        if document.user_id != caller.user_id {
            return Err(UseCaseError::Forbidden(
                "document belongs to another user".to_string(),
            ));
        }

        Ok(document)
    }

    async fn load_journal(&self, caller: &AuthUser, journal_id: Uuid) -> UseCaseResult<DocumentEntity> {
        let document = self.load_owned(caller, journal_id).await?;

        if DocumentType::from_str(&document.document_type) != Some(DocumentType::Journal) {
            return Err(UseCaseError::NotFound("journal not found".to_string()));
        }

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crates::domain::{
        entities::{
            documents::{DocumentAuditEntity, SurveyEntity},
            relationships::RelationshipEntity,
        },
        repositories::{
            documents::MockDocumentRepository, relationships::MockRelationshipRepository,
        },
        value_objects::{documents::AUDIT_ACTION_UPDATE, enums::user_roles::UserRole},
    };
    use mockall::predicate::eq;
    use serde_json::json;

    fn caller(id: Uuid, role: UserRole) -> AuthUser {
        AuthUser {
            user_id: id,
            email: "a@x.com".to_string(),
            role,
        }
    }

    fn document(user_id: Uuid, document_type: DocumentType, content: serde_json::Value) -> DocumentEntity {
        let now = Utc::now();
        DocumentEntity {
            id: Uuid::new_v4(),
            user_id,
            document_type: document_type.to_string(),
            document_content: content,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn update_writes_exactly_one_audit_row() {
        let owner = Uuid::new_v4();
        let before = document(owner, DocumentType::Journal, json!({"mood": 2}));
        let document_id = before.id;
        let old_content = before.document_content.clone();

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_document()
            .with(eq(document_id))
            .returning(move |_| Ok(Some(before.clone())));
        documents
            .expect_update_document_with_audit()
            .with(eq(document_id), eq(owner), eq(json!({"mood": 4})))
            .times(1)
            .returning(move |id, actor, content| {
                let now = Utc::now();
                let updated = DocumentEntity {
                    id,
                    user_id: actor,
                    document_type: "journal".to_string(),
                    document_content: content.clone(),
                    created_at: now,
                    updated_at: now,
                };
                let audit = DocumentAuditEntity {
                    id: Uuid::new_v4(),
                    document_id: id,
                    user_id: actor,
                    action: AUDIT_ACTION_UPDATE.to_string(),
                    old_content: Some(old_content.clone()),
                    new_content: Some(content),
                    created_at: now,
                };
                Ok(Some((updated, audit)))
            });

        let usecase = DocumentUseCase::new(
            Arc::new(documents),
            Arc::new(MockRelationshipRepository::new()),
        );
        let model = usecase
            .update_document(&caller(owner, UserRole::Student), document_id, json!({"mood": 4}))
            .await
            .unwrap();

        assert_eq!(model.document_content, json!({"mood": 4}));
    }

    #[tokio::test]
    async fn foreign_document_cannot_be_updated() {
        let before = document(Uuid::new_v4(), DocumentType::Survey, json!({"q1": "yes"}));
        let document_id = before.id;

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_document()
            .returning(move |_| Ok(Some(before.clone())));
        documents.expect_update_document_with_audit().never();

        let usecase = DocumentUseCase::new(
            Arc::new(documents),
            Arc::new(MockRelationshipRepository::new()),
        );
        let err = usecase
            .update_document(
                &caller(Uuid::new_v4(), UserRole::Student),
                document_id,
                json!({"q1": "no"}),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn survey_is_not_served_as_journal() {
        let owner = Uuid::new_v4();
        let survey = document(owner, DocumentType::WeeklySurvey, json!({"sleep": 6}));
        let survey_id = survey.id;

        let mut documents = MockDocumentRepository::new();
        documents
            .expect_find_document()
            .returning(move |_| Ok(Some(survey.clone())));

        let usecase = DocumentUseCase::new(
            Arc::new(documents),
            Arc::new(MockRelationshipRepository::new()),
        );
        let err = usecase
            .get_journal(&caller(owner, UserRole::Student), survey_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn current_therapist_reads_student_surveys() {
        let student_id = Uuid::new_v4();
        let therapist_id = Uuid::new_v4();

        let mut relationships = MockRelationshipRepository::new();
        relationships
            .expect_find_by_student()
            .with(eq(student_id))
            .returning(move |_| {
                let now = Utc::now();
                Ok(Some(RelationshipEntity {
                    student_id,
                    current_therapist_id: Some(therapist_id),
                    requested_therapist_id: None,
                    status: "active".to_string(),
                    created_at: now,
                    updated_at: now,
                }))
            });

        let survey_doc = document(student_id, DocumentType::Survey, json!({"q1": 3}));
        let mut documents = MockDocumentRepository::new();
        documents
            .expect_list_surveys()
            .with(eq(student_id))
            .returning(move |_| {
                Ok(vec![(
                    SurveyEntity {
                        id: Uuid::new_v4(),
                        user_id: student_id,
                        document_id: survey_doc.id,
                        created_at: Utc::now(),
                    },
                    survey_doc.clone(),
                )])
            });

        let usecase = DocumentUseCase::new(Arc::new(documents), Arc::new(relationships));
        let surveys = usecase
            .list_student_surveys(&caller(therapist_id, UserRole::Therapist), student_id)
            .await
            .unwrap();

        assert_eq!(surveys.len(), 1);
        assert_eq!(surveys[0].survey_type, "survey");
    }

    #[tokio::test]
    async fn unrelated_therapist_cannot_read_student_surveys() {
        let student_id = Uuid::new_v4();

        let mut relationships = MockRelationshipRepository::new();
        relationships
            .expect_find_by_student()
            .returning(|_| Ok(None));

        let mut documents = MockDocumentRepository::new();
        documents.expect_list_surveys().never();

        let usecase = DocumentUseCase::new(Arc::new(documents), Arc::new(relationships));
        let err = usecase
            .list_student_surveys(&caller(Uuid::new_v4(), UserRole::Therapist), student_id)
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }
}
