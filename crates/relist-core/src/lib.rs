//! Core types and trait definitions for relist, a store of todo lists with
//! full change history and point-in-time restore.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::ListStore`]; the API layer depends on
//! that abstraction only.

pub mod error;
pub mod id;
pub mod list;
pub mod revision;
pub mod staleness;
pub mod store;
pub mod view;

pub use error::{Error, Result};
