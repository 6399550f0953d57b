use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, OptionalExtension, RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{document_audits, documents, surveys},
    },
};
use domain::{
    entities::documents::{
        DocumentAuditEntity, DocumentEntity, InsertDocumentAuditEntity, InsertDocumentEntity,
        InsertSurveyEntity, SurveyEntity,
    },
    repositories::documents::DocumentRepository,
    value_objects::documents::AUDIT_ACTION_UPDATE,
};

pub struct DocumentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl DocumentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl DocumentRepository for DocumentPostgres {
    async fn create_document(&self, document: InsertDocumentEntity) -> Result<DocumentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(documents::table)
            .values(&document)
            .returning(DocumentEntity::as_returning())
            .get_result::<DocumentEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_document(&self, document_id: Uuid) -> Result<Option<DocumentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = documents::table
            .filter(documents::id.eq(document_id))
            .select(DocumentEntity::as_select())
            .first::<DocumentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_documents(
        &self,
        user_id: Uuid,
        document_type: String,
    ) -> Result<Vec<DocumentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = documents::table
            .filter(documents::user_id.eq(user_id))
            .filter(documents::document_type.eq(document_type))
            .select(DocumentEntity::as_select())
            .order(documents::created_at.desc())
            .load::<DocumentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_document_with_audit(
        &self,
        document_id: Uuid,
        actor_id: Uuid,
        new_content: serde_json::Value,
    ) -> Result<Option<(DocumentEntity, DocumentAuditEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn
            .transaction::<Option<(DocumentEntity, DocumentAuditEntity)>, diesel::result::Error, _>(
                |tx| {
                    // Lock the row so the audit's old content is the state this update replaces.
                    let current = documents::table
                        .filter(documents::id.eq(document_id))
                        .select(DocumentEntity::as_select())
                        .for_update()
                        .first::<DocumentEntity>(tx)
                        .optional()?;

                    let Some(current) = current else {
                        return Ok(None);
                    };

                    let updated = update(documents::table.filter(documents::id.eq(document_id)))
                        .set((
                            documents::document_content.eq(&new_content),
                            documents::updated_at.eq(Utc::now()),
                        ))
                        .returning(DocumentEntity::as_returning())
                        .get_result::<DocumentEntity>(tx)?;

                    let audit = insert_into(document_audits::table)
                        .values(&InsertDocumentAuditEntity {
                            document_id,
                            user_id: actor_id,
                            action: AUDIT_ACTION_UPDATE.to_string(),
                            old_content: Some(current.document_content),
                            new_content: Some(updated.document_content.clone()),
                        })
                        .returning(DocumentAuditEntity::as_returning())
                        .get_result::<DocumentAuditEntity>(tx)?;

                    Ok(Some((updated, audit)))
                },
            )?;

        Ok(result)
    }

    async fn delete_document(&self, document_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let deleted =
            delete(documents::table.filter(documents::id.eq(document_id))).execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn list_audits(&self, document_id: Uuid) -> Result<Vec<DocumentAuditEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = document_audits::table
            .filter(document_audits::document_id.eq(document_id))
            .select(DocumentAuditEntity::as_select())
            .order(document_audits::created_at.asc())
            .load::<DocumentAuditEntity>(&mut conn)?;

        Ok(results)
    }

    async fn create_survey(
        &self,
        document: InsertDocumentEntity,
    ) -> Result<(SurveyEntity, DocumentEntity)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<(SurveyEntity, DocumentEntity), diesel::result::Error, _>(
            |tx| {
                let document = insert_into(documents::table)
                    .values(&document)
                    .returning(DocumentEntity::as_returning())
                    .get_result::<DocumentEntity>(tx)?;

                let survey = insert_into(surveys::table)
                    .values(&InsertSurveyEntity {
                        user_id: document.user_id,
                        document_id: document.id,
                    })
                    .returning(SurveyEntity::as_returning())
                    .get_result::<SurveyEntity>(tx)?;

                Ok((survey, document))
            },
        )?;

        Ok(result)
    }

    async fn list_surveys(&self, user_id: Uuid) -> Result<Vec<(SurveyEntity, DocumentEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = surveys::table
            .inner_join(documents::table.on(surveys::document_id.eq(documents::id)))
            .filter(surveys::user_id.eq(user_id))
            .select((SurveyEntity::as_select(), DocumentEntity::as_select()))
            .order(surveys::created_at.desc())
            .load::<(SurveyEntity, DocumentEntity)>(&mut conn)?;

        Ok(results)
    }
}
