//! Item records and the item extractor
//!
//! An [`ItemRecord`] is built entirely from one fetched item page plus the
//! URL and breadcrumb of the task that fetched it. Fields a page does not
//! provide are left empty rather than failing the item; the extractor
//! reports them alongside the record.

mod extractor;

pub use extractor::{extract_item, Field, FieldPolicy, ItemExtraction};

use crate::crawler::BrowsePath;
use serde::{Deserialize, Serialize};

/// A normalized catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Absolute URL of the item page
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Absolute image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Sheet height in centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Sheet width in centimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Credited artists, in page order
    pub artist: Vec<String>,

    /// Category names the item was reached through, root first
    pub path: BrowsePath,
}
