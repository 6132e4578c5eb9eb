pub mod data_store;
pub mod identity;
