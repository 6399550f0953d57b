use std::{collections::HashMap, sync::Arc};

use crates::domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity},
    repositories::{invoices::InvoiceRepository, participants::ParticipantRepository},
    value_objects::{
        enums::invoice_statuses::InvoiceStatus,
        invoices::{InvoiceModel, InvoiceView},
        participants::ParticipantName,
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    usecases::errors::{UseCaseError, UseCaseResult},
};

pub struct InvoiceUseCase<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    invoice_repo: Arc<I>,
    participant_repo: Arc<P>,
}

impl<I, P> InvoiceUseCase<I, P>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    pub fn new(invoice_repo: Arc<I>, participant_repo: Arc<P>) -> Self {
        Self {
            invoice_repo,
            participant_repo,
        }
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        invoice: InsertInvoiceEntity,
    ) -> UseCaseResult<InvoiceView> {
        if caller.user_id != invoice.therapist_id {
            return Err(UseCaseError::Forbidden(
                "invoices can only be issued by their therapist".to_string(),
            ));
        }

        let created = self
            .invoice_repo
            .create_invoice(invoice)
            .await
            .map_err(|err| {
                error!(therapist_id = %caller.user_id, db_error = ?err, "invoices: failed to create invoice");
                UseCaseError::Internal(err)
            })?;

        info!(invoice_id = %created.id, amount_due = created.amount_due, "invoices: invoice created");
        self.view(created).await
    }

    pub async fn list(&self, caller: &AuthUser) -> UseCaseResult<Vec<InvoiceView>> {
        let user_id = caller.user_id;
        let invoices = self
            .invoice_repo
            .list_for_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "invoices: failed to list invoices");
                UseCaseError::Internal(err)
            })?;

        let names = self
            .names(
                invoices
                    .iter()
                    .flat_map(|i| [i.student_id, i.therapist_id])
                    .collect(),
            )
            .await?;

        Ok(invoices
            .into_iter()
            .map(|invoice| build_view(invoice, &names))
            .collect())
    }

    pub async fn get(&self, caller: &AuthUser, invoice_id: Uuid) -> UseCaseResult<InvoiceView> {
        let invoice = self.load_for_participant(caller, invoice_id).await?;
        self.view(invoice).await
    }

    /// Adds `amount` to the invoice. Status and the overpayment guard are
    /// applied by the same UPDATE, so a concurrent payment cannot overshoot.
    pub async fn pay(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
        amount: i64,
    ) -> UseCaseResult<InvoiceView> {
        info!(%invoice_id, amount, "invoices: payment requested");

        if amount <= 0 {
            return Err(UseCaseError::Validation(
                "amountPaid must be greater than zero".to_string(),
            ));
        }

        let invoice = self.load_for_participant(caller, invoice_id).await?;
        if caller.user_id != invoice.student_id {
            return Err(UseCaseError::Forbidden(
                "only the billed student can pay this invoice".to_string(),
            ));
        }

        let outstanding = invoice.amount_due - invoice.amount_paid;
        if amount > outstanding {
            warn!(%invoice_id, amount, outstanding, "invoices: payment exceeds outstanding balance");
            let message = match InvoiceStatus::derive(invoice.amount_due, invoice.amount_paid) {
                InvoiceStatus::Paid => "invoice is already paid",
                _ => "payment exceeds the outstanding balance",
            };
            return Err(UseCaseError::Validation(message.to_string()));
        }

        let paid = self
            .invoice_repo
            .apply_payment(invoice_id, amount)
            .await
            .map_err(|err| {
                error!(%invoice_id, db_error = ?err, "invoices: failed to apply payment");
                UseCaseError::Internal(err)
            })?;

        match paid {
            Some(invoice) => {
                info!(%invoice_id, status = %invoice.status, amount_paid = invoice.amount_paid, "invoices: payment applied");
                self.view(invoice).await
            }
            None => {
                warn!(%invoice_id, amount, "invoices: balance changed before the payment applied");
                Err(UseCaseError::Validation(
                    "payment exceeds the outstanding balance".to_string(),
                ))
            }
        }
    }

    async fn load_for_participant(
        &self,
        caller: &AuthUser,
        invoice_id: Uuid,
    ) -> UseCaseResult<InvoiceEntity> {
        let invoice = self
            .invoice_repo
            .find_invoice(invoice_id)
            .await
            .map_err(|err| {
                error!(%invoice_id, db_error = ?err, "invoices: failed to load invoice");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| UseCaseError::NotFound("invoice not found".to_string()))?;

        if caller.user_id != invoice.student_id && caller.user_id != invoice.therapist_id {
            return Err(UseCaseError::Forbidden(
                "not a participant of this invoice".to_string(),
            ));
        }

        Ok(invoice)
    }

    async fn names(&self, ids: Vec<Uuid>) -> UseCaseResult<HashMap<Uuid, ParticipantName>> {
        self.participant_repo.find_names(ids).await.map_err(|err| {
            error!(db_error = ?err, "invoices: failed to load participant names");
            UseCaseError::Internal(err)
        })
    }

    async fn view(&self, invoice: InvoiceEntity) -> UseCaseResult<InvoiceView> {
        let names = self
            .names(vec![invoice.student_id, invoice.therapist_id])
            .await?;
        Ok(build_view(invoice, &names))
    }
}

fn build_view(invoice: InvoiceEntity, names: &HashMap<Uuid, ParticipantName>) -> InvoiceView {
    let student = names.get(&invoice.student_id).cloned();
    let therapist = names.get(&invoice.therapist_id).cloned();
    let invoice = InvoiceModel::from(invoice);

    InvoiceView {
        outstanding: invoice.outstanding(),
        invoice,
        student,
        therapist,
    }
}
