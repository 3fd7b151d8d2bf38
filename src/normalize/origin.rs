use crate::{ConfigError, ParseError};
use url::Url;

/// Resolves the base origin (`scheme://host[:port]/`) of a seed URL
///
/// The origin is computed once at startup and every relative link found
/// during the crawl is resolved against it. A non-default port is kept so
/// the origin still addresses the same server.
///
/// # Arguments
///
/// * `seed` - The seed URL string
///
/// # Returns
///
/// * `Ok(Url)` - The origin, always with a `/` path
/// * `Err(ConfigError)` - The seed has no scheme, is not HTTP(S), or has no host
///
/// # Examples
///
/// ```
/// use catalog_walker::normalize::resolve_origin;
///
/// let origin = resolve_origin("http://catalog.example.com/browse/?page=2").unwrap();
/// assert_eq!(origin.as_str(), "http://catalog.example.com/");
/// ```
pub fn resolve_origin(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use http or https, got '{}'",
            seed,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    let origin = format!("{}/", url.origin().ascii_serialization());
    Url::parse(&origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", origin, e)))
}

/// Resolves a link href found on a page against the crawl origin
///
/// Relative hrefs (`browse/abc`, `/browse/abc`) resolve against the origin;
/// absolute hrefs are kept as they are.
///
/// # Arguments
///
/// * `origin` - The origin returned by [`resolve_origin`]
/// * `href` - The raw href or src attribute value
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL
/// * `Err(ParseError)` - The href is empty or cannot be joined
pub fn resolve_link(origin: &Url, href: &str) -> Result<Url, ParseError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(ParseError::InvalidLink {
            href: href.to_string(),
            reason: "empty href".to_string(),
        });
    }

    origin.join(href).map_err(|e| ParseError::InvalidLink {
        href: href.to_string(),
        reason: e.to_string(),
    })
}
