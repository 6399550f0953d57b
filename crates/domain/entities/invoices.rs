use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::invoices;

/// Amounts are minor currency units.
#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable, QueryableByName)]
#[diesel(table_name = invoices)]
pub struct InvoiceEntity {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub due_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub struct InsertInvoiceEntity {
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub due_date: NaiveDate,
    pub status: String,
}
