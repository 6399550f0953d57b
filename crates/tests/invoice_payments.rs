//! Runs against a migrated PostgreSQL database:
//! `DATABASE_URL=... cargo test -p crates -- --ignored`

mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use crates::{
    domain::{
        entities::invoices::InsertInvoiceEntity,
        repositories::invoices::InvoiceRepository,
        value_objects::enums::invoice_statuses::InvoiceStatus,
    },
    infra::db::repositories::{invoices::InvoicePostgres, users::UserPostgres},
};

const AMOUNT_DUE: i64 = 10_000;

#[tokio::test]
#[ignore]
async fn payments_move_the_invoice_through_partial_to_paid() {
    let db_pool = common::pool();
    let users = UserPostgres::new(Arc::clone(&db_pool));
    let invoices = InvoicePostgres::new(Arc::clone(&db_pool));

    let student_email = common::unique_email("payer");
    let therapist_email = common::unique_email("biller");
    let student_id = common::register_student(&users, &student_email).await;
    let therapist_id = common::register_therapist(
        &db_pool,
        &users,
        &therapist_email,
        &common::unique_license(),
    )
    .await;

    let invoice = invoices
        .create_invoice(InsertInvoiceEntity {
            student_id,
            therapist_id,
            amount_due: AMOUNT_DUE,
            amount_paid: 0,
            due_date: NaiveDate::from_ymd_opt(2030, 1, 31).expect("date"),
            status: InvoiceStatus::derive(AMOUNT_DUE, 0).to_string(),
        })
        .await
        .expect("create invoice");
    assert_eq!(invoice.status, InvoiceStatus::Unpaid.to_string());

    let partial = invoices
        .apply_payment(invoice.id, 4_000)
        .await
        .expect("partial payment")
        .expect("payment applied");
    assert_eq!(partial.amount_paid, 4_000);
    assert_eq!(partial.status, InvoiceStatus::Partial.to_string());
    assert_eq!(
        partial.status,
        InvoiceStatus::derive(partial.amount_due, partial.amount_paid).to_string()
    );

    let overpaid = invoices
        .apply_payment(invoice.id, 6_001)
        .await
        .expect("overpayment is not a database error");
    assert!(overpaid.is_none());

    let huge = invoices
        .apply_payment(invoice.id, i64::MAX)
        .await
        .expect("i64::MAX stays inside bigint");
    assert!(huge.is_none());

    let paid = invoices
        .apply_payment(invoice.id, 6_000)
        .await
        .expect("exact payoff")
        .expect("payment applied");
    assert_eq!(paid.amount_paid, AMOUNT_DUE);
    assert_eq!(paid.status, InvoiceStatus::Paid.to_string());
    assert_eq!(
        paid.status,
        InvoiceStatus::derive(paid.amount_due, paid.amount_paid).to_string()
    );

    let after_settled = invoices
        .apply_payment(invoice.id, 1)
        .await
        .expect("payment on a settled invoice");
    assert!(after_settled.is_none());

    let stored = invoices
        .find_invoice(invoice.id)
        .await
        .expect("reload")
        .expect("invoice exists");
    assert_eq!(stored.amount_paid, AMOUNT_DUE);

    common::remove_existing(&users, &student_email).await;
    common::remove_existing(&users, &therapist_email).await;
}
