pub mod appointments;
pub mod auth_credentials;
pub mod conversations;
pub mod documents;
pub mod invoices;
pub mod relationships;
pub mod reviews;
pub mod therapists;
pub mod users;
pub mod verified_licenses;
