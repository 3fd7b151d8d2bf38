/// Canonicalizes a category name for comparison
///
/// The name is case-folded and every whitespace character is removed, so
/// `"In Sunsh"`, `" in   sunsh"` and `"INSUNSH"` all compare equal.
///
/// # Examples
///
/// ```
/// use catalog_walker::normalize::canonicalize_category;
///
/// assert_eq!(canonicalize_category("In Sunsh"), "insunsh");
/// assert_eq!(canonicalize_category(" in   sunsh"), "insunsh");
/// ```
pub fn canonicalize_category(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Canonicalizes an ordered sequence of category names element-wise
///
/// Order is preserved; each element is canonicalized exactly as
/// [`canonicalize_category`] would canonicalize it on its own.
pub fn canonicalize_categories<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| canonicalize_category(name.as_ref()))
        .collect()
}
