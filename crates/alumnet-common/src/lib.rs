//! Alumnet Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging setup for the Alumnet workspace members.

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{AlumnetError, Result};
