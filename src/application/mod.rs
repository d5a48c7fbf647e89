//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait and give
//! HTTP handlers and the admin CLI a small API:
//!
//! - [`services::code_allocator::CodeAllocator`] - Generated and custom code selection
//! - [`services::link_service::LinkService`] - Create, read, update, delete and stats
//! - [`services::redirect_service::RedirectService`] - Redirect eligibility and click counting

pub mod services;
