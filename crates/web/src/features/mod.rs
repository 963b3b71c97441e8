pub mod entries;
pub mod stats;
pub mod system;
