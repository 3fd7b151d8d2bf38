use crate::page::{Anchor, PageQuery, Query};
use scraper::{ElementRef, Html};

/// A fetched page parsed into an HTML document
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    /// Parses page content; malformed markup is repaired, never rejected
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }
}

/// Collects an element's text, trimmed; `None` if blank
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

impl PageQuery for HtmlPage {
    fn anchors(&self, links: &Query, label: Option<&Query>) -> Vec<Anchor> {
        self.document
            .select(links.selector())
            .map(|element| {
                let label = match label {
                    Some(query) => element
                        .select(query.selector())
                        .next()
                        .and_then(element_text),
                    None => element_text(element),
                };

                Anchor {
                    label,
                    href: element.value().attr("href").map(str::to_string),
                }
            })
            .collect()
    }

    fn texts(&self, query: &Query) -> Vec<String> {
        self.document
            .select(query.selector())
            .filter_map(element_text)
            .collect()
    }

    fn attrs(&self, query: &Query, attr: &str) -> Vec<String> {
        self.document
            .select(query.selector())
            .filter_map(|element| element.value().attr(attr))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }
}
