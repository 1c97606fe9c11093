pub mod bibtex;
pub mod clipboard;
pub mod config;
pub mod copy;
pub mod document;
pub mod notify;
pub mod utils;

pub use copy::{COPY_CONFIRMATION, CopyError, CopyHandler, CopyOutcome, ErrorPolicy};
