use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::{document_audits, documents, surveys};

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = documents)]
pub struct DocumentEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: String,
    pub document_content: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub struct InsertDocumentEntity {
    pub user_id: Uuid,
    pub document_type: String,
    pub document_content: serde_json::Value,
}

/// Append-only trail written alongside every document update.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = document_audits)]
pub struct DocumentAuditEntity {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub old_content: Option<serde_json::Value>,
    pub new_content: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = document_audits)]
pub struct InsertDocumentAuditEntity {
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub old_content: Option<serde_json::Value>,
    pub new_content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = surveys)]
pub struct SurveyEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = surveys)]
pub struct InsertSurveyEntity {
    pub user_id: Uuid,
    pub document_id: Uuid,
}
