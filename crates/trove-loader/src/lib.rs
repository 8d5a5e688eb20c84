//! Loader for the trove warehouse: reads parsed record documents and writes
//! them through the DAL, one session per document.

pub mod config;
pub mod document;
pub mod error;
pub mod import;

pub use config::LoaderConfig;
pub use error::{Error, Result};
