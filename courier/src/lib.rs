//! Runtime support for courier-generated HTTP clients.
//!
//! `courier-gen` turns an annotated service trait into a `<Service>Client`
//! implementation. The generated code is plain `reqwest::blocking` plus the
//! small helpers in this crate:
//!
//! - [`request`] - URL joining, header and cookie application, dispatch
//! - [`body`] - JSON / XML / form / multipart body construction
//! - [`response`] - reading bodies and decoding JSON, XML and HTML results
//! - [`ClientError`] - the single runtime error type of generated methods
//!
//! ## Example
//!
//! A service contract, written by hand:
//!
//! ```rust,ignore
//! /// @Base https://{host}/api
//! /// @Header(User-Agent) courier
//! pub trait Inventory {
//!     /// @Get /items/{id}
//!     /// @Result json
//!     fn item(&self, id: u64) -> Result<Item, courier::ClientError>;
//! }
//! ```
//!
//! `courier-gen Inventory` then writes `inventory_impl.rs` containing
//! `InventoryClient::new(host)` and `impl Inventory for InventoryClient`.

pub mod body;
pub mod error;
pub mod request;
pub mod response;

pub use error::{ClientError, HtmlError};
pub use response::FromHtml;
pub use scraper;
