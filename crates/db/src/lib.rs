pub mod connection;
pub mod fields;
pub mod indexes;
pub mod models;

pub use connection::{client_options, connect};
