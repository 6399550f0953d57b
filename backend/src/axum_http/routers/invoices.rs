use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
    routing::{get, put},
};
use crates::{
    domain::{
        repositories::{invoices::InvoiceRepository, participants::ParticipantRepository},
        value_objects::invoices::{CreateInvoiceModel, PayInvoiceModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{invoices::InvoicePostgres, participants::ParticipantPostgres},
    },
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    axum_http::{api_response, error_responses::AppError},
    usecases::invoices::InvoiceUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let invoice_repository = InvoicePostgres::new(Arc::clone(&db_pool));
    let participant_repository = ParticipantPostgres::new(Arc::clone(&db_pool));
    let invoice_usecase = InvoiceUseCase::new(
        Arc::new(invoice_repository),
        Arc::new(participant_repository),
    );

    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one))
        .route("/:id/pay", put(pay))
        .with_state(Arc::new(invoice_usecase))
}

pub async fn create<I, P>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<I, P>>>,
    auth: AuthUser,
    payload: Result<Json<CreateInvoiceModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let invoice = model.validate()?;
    let created = invoice_usecase.create(&auth, invoice).await?;

    Ok(api_response::created("Invoice created", created))
}

pub async fn list<I, P>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<I, P>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let invoices = invoice_usecase.list(&auth).await?;
    Ok(api_response::ok(invoices))
}

pub async fn get_one<I, P>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<I, P>>>,
    auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let invoice = invoice_usecase.get(&auth, invoice_id).await?;
    Ok(api_response::ok(invoice))
}

pub async fn pay<I, P>(
    State(invoice_usecase): State<Arc<InvoiceUseCase<I, P>>>,
    auth: AuthUser,
    Path(invoice_id): Path<Uuid>,
    payload: Result<Json<PayInvoiceModel>, JsonRejection>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvoiceRepository + Send + Sync + 'static,
    P: ParticipantRepository + Send + Sync + 'static,
{
    let Json(model) = payload?;
    let amount = model.validate()?;
    let invoice = invoice_usecase.pay(&auth, invoice_id, amount).await?;

    Ok(api_response::ok_with("Payment recorded", invoice))
}
