pub mod entry;

pub use entry::{EntryFilter, EntryRepository};
