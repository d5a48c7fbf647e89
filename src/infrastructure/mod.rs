//! Infrastructure layer for external integrations.
//!
//! Provides the concrete record stores behind
//! [`crate::domain::repositories::LinkRepository`].

pub mod persistence;
