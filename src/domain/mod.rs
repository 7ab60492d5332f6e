//! Domain layer for scholar-rag
//!
//! This module contains the error taxonomy, domain models and the ports
//! through which the core talks to its collaborators.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, IndexError};
