pub mod appointments;
pub mod conversations;
pub mod documents;
pub mod invoices;
pub mod participants;
pub mod relationships;
pub mod reviews;
pub mod therapists;
pub mod users;
