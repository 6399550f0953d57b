use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::relationships;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = relationships, primary_key(student_id))]
pub struct RelationshipEntity {
    pub student_id: Uuid,
    pub current_therapist_id: Option<Uuid>,
    pub requested_therapist_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = relationships)]
pub struct InsertRelationshipEntity {
    pub student_id: Uuid,
    pub current_therapist_id: Option<Uuid>,
    pub requested_therapist_id: Option<Uuid>,
    pub status: String,
}
