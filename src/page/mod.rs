//! Page-query module
//!
//! Walkers and the item extractor locate links and text fragments through
//! the [`PageQuery`] capability only. [`HtmlPage`] provides it on top of
//! `scraper`; tests and other markup engines can supply their own.

mod html;
mod query;

pub use html::HtmlPage;
pub use query::{Query, SelectorSet};

/// A link found on a page: its display text and raw href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Whitespace-trimmed display text, `None` if blank
    pub label: Option<String>,

    /// Raw `href` attribute value
    pub href: Option<String>,
}

/// Query-by-selector capability over a fetched page
pub trait PageQuery {
    /// Returns the anchors matched by `links`, in document order
    ///
    /// When `label` is given, an anchor's label is the text of the first
    /// descendant it matches; otherwise it is the anchor's own text.
    fn anchors(&self, links: &Query, label: Option<&Query>) -> Vec<Anchor>;

    /// Returns the trimmed, non-empty text of every matched element
    fn texts(&self, query: &Query) -> Vec<String>;

    /// Returns the trimmed, non-empty `attr` value of every matched element
    fn attrs(&self, query: &Query, attr: &str) -> Vec<String>;

    /// Returns the first matched text, if any
    fn first_text(&self, query: &Query) -> Option<String> {
        self.texts(query).into_iter().next()
    }

    /// Returns the first matched attribute value, if any
    fn first_attr(&self, query: &Query, attr: &str) -> Option<String> {
        self.attrs(query, attr).into_iter().next()
    }
}
