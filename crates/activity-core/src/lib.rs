//! Shared domain types for the student activity analyzer.
//!
//! Holds the validated record and student types, the error taxonomy and the
//! command-line settings used by the binary.

pub mod error;
pub mod models;
pub mod settings;

pub use error::{ActivityError, Result};
