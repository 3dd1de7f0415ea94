//! HTML result decoding.
//!
//! HTML has no generic data mapping, so `@Result html` targets implement
//! [`FromHtml`] and pull their fields out of the parsed document with CSS
//! selectors. The `select_*` helpers cover the common cases.

use std::str::FromStr;

use scraper::{ElementRef, Html, Selector};

use crate::error::HtmlError;

/// Types that can be filled from a parsed HTML document.
///
/// ## Examples
///
/// ```
/// use courier::response::{FromHtml, select_text};
/// use courier::HtmlError;
///
/// struct Page {
///     heading: String,
/// }
///
/// impl FromHtml for Page {
///     fn from_html(document: &courier::scraper::Html) -> Result<Self, HtmlError> {
///         Ok(Page { heading: select_text(document, "h1")? })
///     }
/// }
///
/// let page = courier::response::html::<Page>(b"<h1>Hi</h1>").unwrap();
/// assert_eq!(page.heading, "Hi");
/// ```
pub trait FromHtml: Sized {
    fn from_html(document: &Html) -> Result<Self, HtmlError>;
}

/// The whole document, serialized back to markup.
impl FromHtml for String {
    fn from_html(document: &Html) -> Result<Self, HtmlError> {
        Ok(document.root_element().html())
    }
}

fn selector(text: &str) -> Result<Selector, HtmlError> {
    Selector::parse(text).map_err(|e| HtmlError::InvalidSelector {
        selector: text.to_string(),
        reason: e.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the trimmed text of the first element matching `css`.
pub fn select_text(document: &Html, css: &str) -> Result<String, HtmlError> {
    let sel = selector(css)?;
    document
        .select(&sel)
        .next()
        .map(element_text)
        .ok_or_else(|| HtmlError::Missing(css.to_string()))
}

/// Returns the trimmed text of every element matching `css`, in document order.
pub fn select_all_text(document: &Html, css: &str) -> Result<Vec<String>, HtmlError> {
    let sel = selector(css)?;
    Ok(document.select(&sel).map(element_text).collect())
}

/// Returns an attribute of the first element matching `css`.
///
/// `Ok(None)` means the element exists but lacks the attribute.
pub fn select_attr(document: &Html, css: &str, attr: &str) -> Result<Option<String>, HtmlError> {
    let sel = selector(css)?;
    let element = document
        .select(&sel)
        .next()
        .ok_or_else(|| HtmlError::Missing(css.to_string()))?;
    Ok(element.value().attr(attr).map(str::to_string))
}

/// Parses the text of the first element matching `css`.
pub fn select_parse<T>(document: &Html, css: &str) -> Result<T, HtmlError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let text = select_text(document, css)?;
    text.parse().map_err(|e: T::Err| HtmlError::Conversion {
        selector: css.to_string(),
        reason: e.to_string(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <h1 class="title"> Inventory </h1>
          <ul>
            <li data-id="1">cup</li>
            <li data-id="2">plate</li>
          </ul>
          <span id="count">2</span>
          <span id="bad">two</span>
        </body></html>
    "#;

    fn doc() -> Html {
        Html::parse_document(PAGE)
    }

    #[test]
    fn select_text_trims() {
        assert_eq!(select_text(&doc(), "h1.title").unwrap(), "Inventory");
    }

    #[test]
    fn select_text_missing() {
        let err = select_text(&doc(), "h2").unwrap_err();
        assert!(matches!(err, HtmlError::Missing(ref s) if s == "h2"));
    }

    #[test]
    fn invalid_selector() {
        let err = select_text(&doc(), "li[").unwrap_err();
        assert!(matches!(err, HtmlError::InvalidSelector { .. }));
    }

    #[test]
    fn select_all_in_order() {
        assert_eq!(select_all_text(&doc(), "li").unwrap(), vec!["cup", "plate"]);
    }

    #[test]
    fn select_attr_values() {
        assert_eq!(
            select_attr(&doc(), "li", "data-id").unwrap(),
            Some("1".to_string())
        );
        assert_eq!(select_attr(&doc(), "li", "href").unwrap(), None);
    }

    #[test]
    fn select_parse_numbers() {
        assert_eq!(select_parse::<u32>(&doc(), "#count").unwrap(), 2);
        let err = select_parse::<u32>(&doc(), "#bad").unwrap_err();
        assert!(matches!(err, HtmlError::Conversion { ref text, .. } if text == "two"));
    }

    #[test]
    fn string_gets_whole_document() {
        let html = String::from_html(&doc()).unwrap();
        assert!(html.starts_with("<html>"));
        assert!(html.contains("plate"));
    }
}
