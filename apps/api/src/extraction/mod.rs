pub mod cv;
pub mod job;
pub mod prompts;
pub mod skills;
pub mod structured;

pub use structured::{extract_structured, ExtractionError};
