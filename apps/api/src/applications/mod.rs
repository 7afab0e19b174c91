pub mod handlers;
pub mod patch;
pub mod stats;
pub mod status;
pub mod store;
