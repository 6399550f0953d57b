use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::auth_credentials;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = auth_credentials, primary_key(user_id))]
pub struct AuthCredentialEntity {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `user_id` is filled in by the repository once the user row exists.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_credentials)]
pub struct InsertAuthCredentialEntity {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}
