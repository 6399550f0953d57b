use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    OptionalExtension, RunQueryDsl, insert_into, prelude::*, sql_query,
    sql_types::{BigInt, Uuid as SqlUuid},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::invoices},
};
use domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity},
    repositories::invoices::InvoiceRepository,
};

// Status is derived in the same statement that records the payment, and the
// amount guard rejects overpayment without a prior read. The guard compares
// against the outstanding balance so an oversized amount cannot overflow
// bigint; SET only runs for rows that pass it.
const APPLY_PAYMENT_SQL: &str = "\
UPDATE invoices \
SET amount_paid = amount_paid + $1, \
    status = CASE \
        WHEN amount_paid + $1 >= amount_due THEN 'paid' \
        WHEN amount_paid + $1 > 0 THEN 'partial' \
        ELSE 'unpaid' \
    END, \
    updated_at = now() \
WHERE id = $2 AND $1 <= amount_due - amount_paid \
RETURNING id, student_id, therapist_id, amount_due, amount_paid, due_date, status, created_at, updated_at";

pub struct InvoicePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl InvoicePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InvoiceRepository for InvoicePostgres {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<InvoiceEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(invoices::table)
            .values(&invoice)
            .returning(InvoiceEntity::as_returning())
            .get_result::<InvoiceEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_invoice(&self, invoice_id: Uuid) -> Result<Option<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = invoices::table
            .filter(invoices::id.eq(invoice_id))
            .select(InvoiceEntity::as_select())
            .first::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = invoices::table
            .filter(
                invoices::student_id
                    .eq(user_id)
                    .or(invoices::therapist_id.eq(user_id)),
            )
            .select(InvoiceEntity::as_select())
            .order(invoices::due_date.asc())
            .load::<InvoiceEntity>(&mut conn)?;

        Ok(results)
    }

    async fn apply_payment(&self, invoice_id: Uuid, amount: i64) -> Result<Option<InvoiceEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = sql_query(APPLY_PAYMENT_SQL)
            .bind::<BigInt, _>(amount)
            .bind::<SqlUuid, _>(invoice_id)
            .get_result::<InvoiceEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
