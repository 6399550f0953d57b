use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::appointments;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = appointments)]
pub struct AppointmentEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub struct InsertAppointmentEntity {
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub appointment_date: DateTime<Utc>,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = appointments)]
pub struct UpdateAppointmentEntity {
    pub appointment_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
