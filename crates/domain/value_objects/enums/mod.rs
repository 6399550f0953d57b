pub mod appointment_statuses;
pub mod document_types;
pub mod invoice_statuses;
pub mod relationship_statuses;
pub mod user_roles;
