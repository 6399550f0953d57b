pub mod constraints;
pub mod postgres_connection;
pub mod schema;
