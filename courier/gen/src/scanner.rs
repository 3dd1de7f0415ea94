//! Annotation scanning.
//!
//! Turns doc comment text into [`AnnotationTriple`]s, one per annotated line:
//!
//! ```text
//! @Name(Key) Value      -> ("Name", "Key", "Value")
//! @Name Value           -> ("Name", "", "Value")
//! anything else         -> nothing
//! ```
//!
//! Leading whitespace is ignored and values are trimmed. The scanner does
//! not know which names are meaningful; that is up to the resolvers.

use std::str::Lines;
use std::sync::LazyLock;

use courier_define::AnnotationTriple;
use regex::Regex;

/// `@Name(Key) Value`, checked first.
static KEYED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@([A-Za-z_][0-9A-Za-z_]*)\(([^)]*)\)\s*(.*?)\s*$")
        .expect("Invalid keyed annotation regex")
});

/// `@Name Value`, where the value may be empty.
static BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*@([A-Za-z_][0-9A-Za-z_]*)(?:\s+(.*?))?\s*$")
        .expect("Invalid bare annotation regex")
});

/// Lazy iterator over the annotations of a comment, in line order.
///
/// ## Examples
///
/// ```
/// use courier_gen::scanner::Scanner;
///
/// let text = "Fetches one item.\n@Get /item/{id}\n@Header(Accept) text/html";
/// let triples: Vec<_> = Scanner::new(text).collect();
///
/// assert_eq!(triples.len(), 2);
/// assert_eq!(triples[0].name, "Get");
/// assert_eq!(triples[0].value, "/item/{id}");
/// assert_eq!(triples[1].key, "Accept");
/// ```
pub struct Scanner<'a> {
    lines: Lines<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { lines: text.lines() }
    }
}

impl Iterator for Scanner<'_> {
    type Item = AnnotationTriple;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find_map(scan_line)
    }
}

/// Scans a single line.
pub fn scan_line(line: &str) -> Option<AnnotationTriple> {
    if let Some(caps) = KEYED_RE.captures(line) {
        return Some(AnnotationTriple::new(&caps[1], &caps[2], &caps[3]));
    }
    BARE_RE.captures(line).map(|caps| {
        let value = caps.get(2).map_or("", |m| m.as_str());
        AnnotationTriple::new(&caps[1], "", value)
    })
}

/// Feeds every annotation of `text` to `callback`, in order.
///
/// Stops at the first error and returns it; later lines are not scanned.
pub fn scan<E, F>(text: &str, mut callback: F) -> Result<(), E>
where
    F: FnMut(&AnnotationTriple) -> Result<(), E>,
{
    Scanner::new(text).try_for_each(|triple| callback(&triple))
}
