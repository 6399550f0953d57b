use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::documents::{
    DocumentAuditEntity, DocumentEntity, InsertDocumentEntity, SurveyEntity,
};

#[automock]
#[async_trait]
pub trait DocumentRepository {
    async fn create_document(&self, document: InsertDocumentEntity) -> Result<DocumentEntity>;

    async fn find_document(&self, document_id: Uuid) -> Result<Option<DocumentEntity>>;

    async fn list_documents(
        &self,
        user_id: Uuid,
        document_type: String,
    ) -> Result<Vec<DocumentEntity>>;

    /// Replaces the content and appends exactly one audit row holding the
    /// previous and new content, in one transaction.
    async fn update_document_with_audit(
        &self,
        document_id: Uuid,
        actor_id: Uuid,
        new_content: serde_json::Value,
    ) -> Result<Option<(DocumentEntity, DocumentAuditEntity)>>;

    async fn delete_document(&self, document_id: Uuid) -> Result<bool>;

    async fn list_audits(&self, document_id: Uuid) -> Result<Vec<DocumentAuditEntity>>;

    async fn create_survey(
        &self,
        document: InsertDocumentEntity,
    ) -> Result<(SurveyEntity, DocumentEntity)>;

    async fn list_surveys(&self, user_id: Uuid) -> Result<Vec<(SurveyEntity, DocumentEntity)>>;
}
