//! Annotation resolution.
//!
//! Turns what the analyzer found ([`SourceService`](courier_define::SourceService))
//! into validated descriptors. Methods are resolved first, in declaration
//! order, then the service itself; the first failure aborts the run.

pub mod method;
pub mod service;

pub use method::resolve_method;
pub use service::{BASE_URL_KEY, resolve_service};
