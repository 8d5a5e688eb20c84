//! SQLite backend for the trove warehouse.
//!
//! The write protocols (IODI, IODU, BIODI) and the retrieval primitives are
//! methods on [`Session`], driven by the registry descriptors in
//! [`trove_core::registry`]. [`Dal`] adds the optional-session calling
//! convention and the per-entity operations; [`Warehouse`] runs a `Dal` on a
//! [`tokio_rusqlite`] connection thread for async callers.

mod clinical;
mod dal;
mod encode;
mod retrieve;
mod session;
mod store;
mod thesaurus;
mod upsert;

pub mod error;
pub mod schema;

pub use dal::Dal;
pub use error::{Error, Result};
pub use session::Session;
pub use store::{StoreConfig, Warehouse, connect, connect_in_memory};
pub use upsert::take_first;

#[cfg(test)]
mod tests;
