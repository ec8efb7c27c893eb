pub mod dataset;
pub mod aggregate;
pub mod loader;

pub use dataset::Dataset;
pub use aggregate::Accumulator;
pub use loader::{read_jsonl, write_jsonl};
