pub mod access;
pub mod booking;
pub mod commands;
pub mod errors;
pub mod query;
pub mod value_objects;

pub use errors::*;
pub use query::*;
pub use value_objects::*;
