use once_cell::sync::Lazy;
use regex::Regex;

/// Sheet size pattern: `... (<height> x <width> cm) (sheet)`
static SHEET_DIMENSIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^.*\(([0-9]+\.[0-9]+)\s+x\s+([0-9]+\.[0-9]+)\s+cm\)\s+\(sheet\)")
        .expect("sheet dimension pattern is valid")
});

/// Which component of a physical dimension to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Height,
    Width,
}

/// Parses one component of a sheet size description
///
/// Only the full `(<H> x <W> cm) (sheet)` form is accepted, with both
/// numbers written as decimals. Anything else yields `None`; a missing or
/// unrecognized size is a normal outcome, not an error.
///
/// # Examples
///
/// ```
/// use catalog_walker::normalize::{parse_physical_dimension, Dimension};
///
/// let text = "Giclee print (29.7 x 21.0 cm) (sheet)";
/// assert_eq!(parse_physical_dimension(text, Dimension::Height), Some(29.7));
/// assert_eq!(parse_physical_dimension(text, Dimension::Width), Some(21.0));
/// assert_eq!(parse_physical_dimension("Unknown size", Dimension::Height), None);
/// ```
pub fn parse_physical_dimension(text: &str, which: Dimension) -> Option<f64> {
    let captures = SHEET_DIMENSIONS.captures(text)?;
    let group = match which {
        Dimension::Height => 1,
        Dimension::Width => 2,
    };
    captures.get(group)?.as_str().parse().ok()
}
