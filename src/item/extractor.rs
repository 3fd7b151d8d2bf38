use crate::crawler::BrowsePath;
use crate::item::ItemRecord;
use crate::normalize::{parse_physical_dimension, resolve_link, Dimension};
use crate::page::{PageQuery, Query};
use crate::walker::WalkContext;
use std::fmt;
use url::Url;

/// How many matched values a field keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Keep only the first matched value
    TakeFirst,
    /// Keep every matched value, in page order
    KeepAll,
}

/// Fields of an [`ItemRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Url,
    Title,
    Image,
    Height,
    Width,
    Description,
    Artist,
    Path,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Url,
        Field::Title,
        Field::Image,
        Field::Height,
        Field::Width,
        Field::Description,
        Field::Artist,
        Field::Path,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Title => "title",
            Self::Image => "image",
            Self::Height => "height",
            Self::Width => "width",
            Self::Description => "description",
            Self::Artist => "artist",
            Self::Path => "path",
        }
    }

    pub fn policy(&self) -> FieldPolicy {
        match self {
            Self::Artist | Self::Path => FieldPolicy::KeepAll,
            _ => FieldPolicy::TakeFirst,
        }
    }

    /// Whether a page is expected to always provide this field
    ///
    /// Sizes are optional: an unrecognized size text is a normal absence.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Height | Self::Width)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of extracting one item page
#[derive(Debug, Clone, PartialEq)]
pub struct ItemExtraction {
    pub record: ItemRecord,

    /// Required fields the page did not provide
    pub missing: Vec<Field>,
}

impl ItemExtraction {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Reads the text values of a field according to its policy
fn text_values<P: PageQuery + ?Sized>(page: &P, query: &Query, field: Field) -> Vec<String> {
    match field.policy() {
        FieldPolicy::KeepAll => page.texts(query),
        FieldPolicy::TakeFirst => page.first_text(query).into_iter().collect(),
    }
}

/// Reads the attribute values of a field according to its policy
fn attr_values<P: PageQuery + ?Sized>(
    page: &P,
    query: &Query,
    attr: &str,
    field: Field,
) -> Vec<String> {
    match field.policy() {
        FieldPolicy::KeepAll => page.attrs(query, attr),
        FieldPolicy::TakeFirst => page.first_attr(query, attr).into_iter().collect(),
    }
}

/// Single value of a `TakeFirst` field
fn single(values: Vec<String>) -> Option<String> {
    values.into_iter().next()
}

/// Extracts an item record from a fetched item page
///
/// `url` and `path` come from the task, not from the page. The image source
/// is resolved against the crawl origin and both sizes are parsed from the
/// same dimension text. Extraction never fails: absent required fields are
/// listed in [`ItemExtraction::missing`].
pub fn extract_item<P: PageQuery + ?Sized>(
    page: &P,
    url: &Url,
    path: &BrowsePath,
    ctx: &WalkContext,
) -> ItemExtraction {
    let selectors = &ctx.selectors;

    let artist = text_values(page, &selectors.artist, Field::Artist);
    let title = single(text_values(page, &selectors.title, Field::Title));
    let description = single(text_values(page, &selectors.description, Field::Description));

    let image = single(attr_values(page, &selectors.image, "src", Field::Image))
        .and_then(|src| match resolve_link(&ctx.origin, &src) {
            Ok(image) => Some(image.to_string()),
            Err(e) => {
                tracing::debug!(url = %url, "Ignoring unusable image source: {}", e);
                None
            }
        });

    // Both sizes come from the same text, read under the height policy
    let dimensions = single(text_values(page, &selectors.dimensions, Field::Height));
    let height = dimensions
        .as_deref()
        .and_then(|text| parse_physical_dimension(text, Dimension::Height));
    let width = dimensions
        .as_deref()
        .and_then(|text| parse_physical_dimension(text, Dimension::Width));

    let record = ItemRecord {
        url: url.to_string(),
        title,
        image,
        height,
        width,
        description,
        artist,
        path: path.clone(),
    };

    let missing = Field::ALL
        .into_iter()
        .filter(|field| field.is_required() && !has_value(&record, *field))
        .collect();

    ItemExtraction { record, missing }
}

fn has_value(record: &ItemRecord, field: Field) -> bool {
    match field {
        Field::Url => !record.url.is_empty(),
        Field::Title => record.title.is_some(),
        Field::Image => record.image.is_some(),
        Field::Height => record.height.is_some(),
        Field::Width => record.width.is_some(),
        Field::Description => record.description.is_some(),
        Field::Artist => !record.artist.is_empty(),
        // The root page's own listing has an empty breadcrumb
        Field::Path => true,
    }
}
