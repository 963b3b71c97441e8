pub mod entry;
pub mod stats;
