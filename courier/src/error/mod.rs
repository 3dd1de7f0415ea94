//! Error types of the courier runtime.

mod client_error;
mod html_error;

pub use client_error::ClientError;
pub use html_error::HtmlError;
