use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::invoices::{InsertInvoiceEntity, InvoiceEntity};

#[automock]
#[async_trait]
pub trait InvoiceRepository {
    async fn create_invoice(&self, invoice: InsertInvoiceEntity) -> Result<InvoiceEntity>;

    async fn find_invoice(&self, invoice_id: Uuid) -> Result<Option<InvoiceEntity>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<InvoiceEntity>>;

    /// Adds `amount` and recomputes the status in one UPDATE. Returns `None`
    /// when the invoice is missing or the payment would exceed the amount due.
    async fn apply_payment(&self, invoice_id: Uuid, amount: i64) -> Result<Option<InvoiceEntity>>;
}
