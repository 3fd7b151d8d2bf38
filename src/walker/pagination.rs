use crate::crawler::{BrowsePath, CrawlTask};
use crate::normalize::resolve_link;
use crate::page::PageQuery;
use crate::walker::context::{PaginationMarkers, WalkContext};
use crate::ParseError;

/// Role of a link in an item listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingLink {
    Previous,
    Next,
    Item,
}

/// Classifies a listing link by its text
///
/// A link without text can only be an item link.
pub fn classify_link(label: Option<&str>, markers: &PaginationMarkers) -> ListingLink {
    match label {
        Some(text) if markers.is_previous(text) => ListingLink::Previous,
        Some(text) if markers.is_next(text) => ListingLink::Next,
        _ => ListingLink::Item,
    }
}

/// Walks one page of a leaf category's item listing
///
/// Links are handled in page order:
/// - "previous" links are dropped, so a listing is never walked backwards
/// - the "next" link becomes a pagination task with the same path
/// - every other link becomes an item task carrying a copy of `path`
///
/// # Returns
///
/// * `Ok(Vec<CrawlTask>)` - Item and pagination tasks
/// * `Err(ParseError)` - A non-previous link lacks a usable href
pub fn walk_listing<P: PageQuery + ?Sized>(
    page: &P,
    path: &BrowsePath,
    ctx: &WalkContext,
) -> Result<Vec<CrawlTask>, ParseError> {
    let selector = &ctx.selectors.listing_links;
    let mut tasks = Vec::new();

    for (index, anchor) in page.anchors(selector, None).into_iter().enumerate() {
        let role = classify_link(anchor.label.as_deref(), &ctx.markers);
        if role == ListingLink::Previous {
            continue;
        }

        let href = anchor.href.ok_or_else(|| ParseError::MissingHref {
            selector: selector.to_string(),
            index,
        })?;
        let url = resolve_link(&ctx.origin, &href)?;

        let task = match role {
            ListingLink::Next => CrawlTask::pagination(url, path.clone()),
            _ => CrawlTask::item(url, path.clone()),
        };
        tasks.push(task);
    }

    Ok(tasks)
}
