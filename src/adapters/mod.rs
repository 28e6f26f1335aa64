pub mod mock;
pub mod postgres;
