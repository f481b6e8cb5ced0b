//! Core types for the Quill comment store.
//!
//! This crate is deliberately free of database dependencies. The storage
//! backend (`quill-store-sqlite`) and the admin binary both depend on it.

pub mod bloom;
pub mod comment;
pub mod error;
pub mod thread;

pub use bloom::Bloomfilter;
pub use error::{Error, Result};
