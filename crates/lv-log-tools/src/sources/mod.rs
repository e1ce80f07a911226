//! Concrete sources, in fallback priority order.

pub mod file;
pub mod journal;
pub mod raw_file;

pub use file::PlainFileSource;
pub use journal::JournalSource;
pub use raw_file::RawFileSource;
