//! Catalogue service used by the integration tests.

use std::io::Read;

use courier::scraper::Html;
use courier::{ClientError, FromHtml, HtmlError};
use reqwest::blocking::{Request, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub price: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub item: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct Title(pub String);

impl FromHtml for Title {
    fn from_html(html: &Html) -> Result<Self, HtmlError> {
        courier::response::select_text(html, "title").map(Title)
    }
}

/// Catalogue of a shop.
///
/// @Base https://{host}/api/v1
/// @Header(Authorization) Bearer {token}
/// @Header(User-Agent) courier-tests
/// @Cookie(region) {region}
pub trait Store {
    /// Fetches one item.
    ///
    /// @Get /items/{id}
    /// @Result json
    fn item(&self, id: u64) -> Result<Item, ClientError>;

    /// @Get /items
    /// @Header(Accept) application/xml
    /// @Result xml
    fn catalogue(&self) -> Result<(Catalogue, u16), ClientError>;

    /// Unannotated parameters become JSON fields.
    ///
    /// @Post /items
    fn create(&self, name: &str, price: u32) -> Result<(Item, u16), ClientError>;

    /// @Put /items/{id}
    /// @SingleBody xml
    /// @Result json
    fn replace(&self, id: u64, item: &Item) -> Result<Item, ClientError>;

    /// @Post /search
    /// @Body form
    /// @Param(q) name:{query}
    /// @Result json
    fn search(&self, query: &str, page: u32) -> Result<Vec<Item>, ClientError>;

    /// @Post /items/{id}/photo
    /// @Body multipart
    /// @File(manual) {path}
    /// @Cookie(session) {session}
    fn upload(&self, id: u64, path: &str, session: &str, photo: impl Read) -> Result<Response, ClientError>;

    /// @Get /items/{id}/page
    /// @Result html
    fn page(&self, id: u64) -> Result<Title, Box<dyn std::error::Error + Send + Sync>>;

    /// @Delete /items/{id}
    fn delete_request(&self, id: u64) -> Result<Request, ClientError>;

    /// Implemented here, not generated.
    fn describe(&self) -> String {
        "store".to_string()
    }
}
