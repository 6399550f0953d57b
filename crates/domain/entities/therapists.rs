use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::therapists;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = therapists, primary_key(user_id))]
pub struct TherapistEntity {
    pub user_id: Uuid,
    pub license_number: String,
    pub specialization: String,
    pub experience_years: i32,
    pub monthly_rate: i64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = therapists)]
pub struct InsertTherapistEntity {
    pub user_id: Uuid,
    pub license_number: String,
    pub specialization: String,
    pub experience_years: i32,
    pub monthly_rate: i64,
    pub available: bool,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = therapists)]
pub struct UpdateTherapistEntity {
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub monthly_rate: Option<i64>,
    pub available: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}
