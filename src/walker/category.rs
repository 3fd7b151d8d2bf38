use crate::crawler::{BrowsePath, CrawlTask};
use crate::normalize::resolve_link;
use crate::page::PageQuery;
use crate::walker::context::WalkContext;
use crate::walker::pagination::walk_listing;
use crate::ParseError;

/// Walks a page believed to list subcategories
///
/// If the page has no subcategory links it is a leaf and is handed to
/// [`walk_listing`] with `path` unchanged. Otherwise one category task is
/// emitted per subcategory link, in page order, each carrying a copy of
/// `path` extended by the subcategory's display name. At the root level only
/// allow-listed names are admitted; deeper levels admit every child.
///
/// # Arguments
///
/// * `page` - The fetched page
/// * `path` - Breadcrumb of the page itself
/// * `root` - Whether this is a root (seed) page
/// * `ctx` - Shared walk context
///
/// # Returns
///
/// * `Ok(Vec<CrawlTask>)` - Follow-up tasks; empty when every child was pruned
/// * `Err(ParseError)` - A subcategory link lacks its name or href; the page
///   contributes no tasks at all
pub fn walk_category<P: PageQuery + ?Sized>(
    page: &P,
    path: &BrowsePath,
    root: bool,
    ctx: &WalkContext,
) -> Result<Vec<CrawlTask>, ParseError> {
    let selectors = &ctx.selectors;
    let anchors = page.anchors(&selectors.subcategory_links, Some(&selectors.subcategory_name));

    if anchors.is_empty() {
        tracing::trace!(path = %path, "No subcategories, treating page as a listing");
        return walk_listing(page, path, ctx);
    }

    let mut tasks = Vec::with_capacity(anchors.len());

    for (index, anchor) in anchors.into_iter().enumerate() {
        let name = anchor.label.ok_or_else(|| ParseError::MissingLabel {
            selector: selectors.subcategory_links.to_string(),
            index,
        })?;

        if root && !ctx.is_allowed(&name) {
            tracing::trace!(category = %name, "Skipping category not on the allow-list");
            continue;
        }

        let href = anchor.href.ok_or_else(|| ParseError::MissingHref {
            selector: selectors.subcategory_links.to_string(),
            index,
        })?;
        let url = resolve_link(&ctx.origin, &href)?;

        tasks.push(CrawlTask::category(url, path.child(name)));
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::crawler::TaskKind;
    use crate::page::{HtmlPage, SelectorSet};
    use crate::walker::PaginationMarkers;
    use url::Url;

    fn context() -> WalkContext {
        WalkContext::new(
            Url::parse("http://example.com/").unwrap(),
            &["In Sunsh", "Summertime"],
            PaginationMarkers::new("Prev", "Next"),
            SelectorSet::compile(&SelectorConfig::default()).unwrap(),
        )
    }

    fn category_page(children: &[(&str, &str)]) -> HtmlPage {
        let links: String = children
            .iter()
            .map(|(name, href)| format!(r#"<div><a href="{}"><h3>{}</h3></a></div>"#, href, name))
            .collect();
        HtmlPage::parse(&format!(
            r#"<html><body><div id="subcats">{}</div></body></html>"#,
            links
        ))
    }

    #[test]
    fn test_root_filters_by_allow_list() {
        let page = category_page(&[
            ("In Sunsh", "browse/in-sunsh"),
            ("Other", "browse/other"),
            ("Summertime", "browse/summertime"),
        ]);
        let tasks = walk_category(&page, &BrowsePath::root(), true, &context()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].url().as_str(), "http://example.com/browse/in-sunsh");
        assert_eq!(tasks[0].path().names(), &["In Sunsh".to_string()]);
        assert_eq!(tasks[1].path().names(), &["Summertime".to_string()]);
        assert!(tasks
            .iter()
            .all(|t| t.kind() == TaskKind::Category { root: false }));
    }

    #[test]
    fn test_root_filter_ignores_case_and_spacing() {
        let page = category_page(&[(" in   SUNSH ", "browse/in-sunsh")]);
        let tasks = walk_category(&page, &BrowsePath::root(), true, &context()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].path().names(), &["in   SUNSH".to_string()]);
    }

    #[test]
    fn test_deeper_levels_admit_all_children() {
        let page = category_page(&[("Other", "browse/a"), ("Anything", "browse/b")]);
        let parent = BrowsePath::root().child("In Sunsh");
        let tasks = walk_category(&page, &parent, false, &context()).unwrap();

        assert_eq!(tasks.len(), 2);
        for task in &tasks {
            assert_eq!(task.path().len(), parent.len() + 1);
            assert_eq!(task.path().names()[..1], parent.names()[..]);
        }
        assert_ne!(tasks[0].path(), tasks[1].path());
        assert_eq!(parent.len(), 1);
    }

    #[test]
    fn test_all_children_pruned_is_not_an_error() {
        let page = category_page(&[("Other", "browse/other")]);
        let tasks = walk_category(&page, &BrowsePath::root(), true, &context()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_leaf_routes_to_listing() {
        let html = r#"<html><body><div id="body"><div>Works</div><div>
            <a href="/item/1">Dawn</a>
            <a href="/browse/x?page=2">Next</a>
        </div></div></body></html>"#;
        let page = HtmlPage::parse(html);
        let path = BrowsePath::root().child("In Sunsh");
        let tasks = walk_category(&page, &path, false, &context()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].kind(), TaskKind::Item);
        assert_eq!(tasks[1].kind(), TaskKind::Pagination);
        assert!(tasks.iter().all(|t| t.path() == &path));
    }

    #[test]
    fn test_missing_name_fails_page() {
        let html = r#"<html><body><div id="subcats">
            <div><a href="/browse/a"><h3>In Sunsh</h3></a></div>
            <div><a href="/browse/b"><span>no heading</span></a></div>
        </div></body></html>"#;
        let page = HtmlPage::parse(html);
        let result = walk_category(&page, &BrowsePath::root(), false, &context());

        assert!(matches!(result, Err(ParseError::MissingLabel { index: 1, .. })));
    }

    #[test]
    fn test_missing_href_fails_page() {
        let html = r#"<html><body><div id="subcats">
            <div><a><h3>Summertime</h3></a></div>
        </div></body></html>"#;
        let page = HtmlPage::parse(html);
        let result = walk_category(&page, &BrowsePath::root(), true, &context());

        assert!(matches!(result, Err(ParseError::MissingHref { index: 0, .. })));
    }

    #[test]
    fn test_filtered_child_needs_no_href() {
        let html = r#"<html><body><div id="subcats">
            <div><a><h3>Other</h3></a></div>
            <div><a href="/browse/s"><h3>Summertime</h3></a></div>
        </div></body></html>"#;
        let page = HtmlPage::parse(html);
        let tasks = walk_category(&page, &BrowsePath::root(), true, &context()).unwrap();

        assert_eq!(tasks.len(), 1);
    }
}
