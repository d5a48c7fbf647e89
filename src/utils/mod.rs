//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Short code generation, normalization and validation
//! - [`url_validator`] - Destination URL checks

pub mod code_generator;
pub mod url_validator;
