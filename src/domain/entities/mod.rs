//! Core domain entities representing the business data model.
//!
//! The service has a single entity, [`ShortLink`]. Creation and partial updates use
//! separate structs so that store-assigned fields (`id`, `click_count`, timestamps)
//! can never be supplied by callers:
//!
//! - [`NewShortLink`] - For inserting new records
//! - [`ShortLinkPatch`] - For partial updates

pub mod link;

pub use link::{LinkStatus, NewShortLink, ShortLink, ShortLinkPatch, UnknownStatus};
