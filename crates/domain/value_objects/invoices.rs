use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::invoices::{InsertInvoiceEntity, InvoiceEntity},
    value_objects::{
        enums::invoice_statuses::InvoiceStatus,
        participants::ParticipantName,
        validation::{ValidationError, required},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceModel {
    pub id: Uuid,
    pub student_id: Uuid,
    pub therapist_id: Uuid,
    pub amount_due: i64,
    pub amount_paid: i64,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvoiceEntity> for InvoiceModel {
    fn from(entity: InvoiceEntity) -> Self {
        Self {
            id: entity.id,
            student_id: entity.student_id,
            therapist_id: entity.therapist_id,
            amount_due: entity.amount_due,
            amount_paid: entity.amount_paid,
            due_date: entity.due_date,
            status: InvoiceStatus::from_str(&entity.status),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl InvoiceModel {
    pub fn outstanding(&self) -> i64 {
        (self.amount_due - self.amount_paid).max(0)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvoiceView {
    #[serde(flatten)]
    pub invoice: InvoiceModel,
    pub outstanding: i64,
    pub student: Option<ParticipantName>,
    pub therapist: Option<ParticipantName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceModel {
    pub student_id: Option<Uuid>,
    pub therapist_id: Option<Uuid>,
    pub amount_due: Option<i64>,
    pub due_date: Option<NaiveDate>,
}

impl CreateInvoiceModel {
    pub fn validate(self) -> Result<InsertInvoiceEntity, ValidationError> {
        let amount_due = required(self.amount_due, "amount_due")?;
        if amount_due <= 0 {
            return Err(ValidationError::Invalid(
                "amount_due must be greater than zero".to_string(),
            ));
        }

        Ok(InsertInvoiceEntity {
            student_id: required(self.student_id, "student_id")?,
            therapist_id: required(self.therapist_id, "therapist_id")?,
            amount_due,
            amount_paid: 0,
            due_date: required(self.due_date, "due_date")?,
            status: InvoiceStatus::derive(amount_due, 0).to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInvoiceModel {
    pub amount_paid: Option<i64>,
}

impl PayInvoiceModel {
    pub fn validate(self) -> Result<i64, ValidationError> {
        let amount = required(self.amount_paid, "amountPaid")?;
        if amount <= 0 {
            return Err(ValidationError::Invalid(
                "amountPaid must be greater than zero".to_string(),
            ));
        }
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_payment_is_rejected() {
        let model = PayInvoiceModel {
            amount_paid: Some(0),
        };
        assert!(model.validate().is_err());
    }

    #[test]
    fn new_invoice_starts_unpaid() {
        let model = CreateInvoiceModel {
            student_id: Some(Uuid::new_v4()),
            therapist_id: Some(Uuid::new_v4()),
            amount_due: Some(15_000),
            due_date: NaiveDate::from_ymd_opt(2026, 11, 1),
        };

        let entity = model.validate().unwrap();
        assert_eq!(entity.amount_paid, 0);
        assert_eq!(entity.status, "unpaid");
    }
}
