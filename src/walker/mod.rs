//! Category and pagination walkers
//!
//! Given a fetched page and the breadcrumb it was reached through, the
//! walkers decide which follow-up [`CrawlTask`](crate::crawler::CrawlTask)s
//! to emit. They never fetch anything themselves.
//!
//! - [`walk_category`] descends the category tree, filtering the root level
//!   by the allow-list, and hands leaf pages to the pagination walker
//! - [`walk_listing`] emits item tasks and follows "next" links, dropping
//!   "previous" links so a listing is never walked backwards

mod category;
mod context;
mod pagination;

pub use category::walk_category;
pub use context::{PaginationMarkers, WalkContext};
pub use pagination::{classify_link, walk_listing, ListingLink};
