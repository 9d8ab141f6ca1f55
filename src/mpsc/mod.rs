mod logger;
mod types;

pub mod ring;

pub use logger::RingLog;
pub use types::{Entry, EntryHeader, Error, Level};
