//! Shared types for the notary engine

pub mod error;

pub use error::{NotaryError, Result};
