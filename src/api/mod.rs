//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service operations and wraps every
//! outcome in the `{ statusCode, message, data }` envelope.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and tracing middleware
//! - [`response`] - The response envelope
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
