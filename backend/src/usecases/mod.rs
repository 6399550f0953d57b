pub mod appointments;
pub mod conversations;
pub mod documents;
pub mod errors;
pub mod invoices;
pub mod relationships;
pub mod reviews;
pub mod therapists;
pub mod users;
