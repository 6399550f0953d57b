pub mod appointments;
pub mod auth;
pub mod conversations;
pub mod documents;
pub mod invoices;
pub mod journals;
pub mod relationships;
pub mod reviews;
pub mod surveys;
pub mod therapists;
pub mod users;
