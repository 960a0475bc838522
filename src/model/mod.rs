pub mod api;
pub mod common;
pub mod ids;
pub mod store;
