use crate::ResolveError;

/// Returns the prefix of `base` up to and including its last `/`
///
/// # Errors
///
/// * `ResolveError::MissingSeparator` - `base` contains no `/`
pub fn directory_of(base: &str) -> Result<&str, ResolveError> {
    base.rfind('/')
        .map(|idx| &base[..=idx])
        .ok_or_else(|| ResolveError::MissingSeparator(base.to_string()))
}

/// Resolves a link found on `base` into an absolute URL
///
/// The result is the directory of `base` (see [`directory_of`]) followed by
/// the trimmed link. Scheme and host are not inspected, and `..`, query and
/// fragment components are carried through verbatim.
///
/// # Arguments
///
/// * `base` - URL of the page the link was found on
/// * `link` - The raw `href` value
///
/// # Returns
///
/// * `Ok(String)` - The absolute URL
/// * `Err(ResolveError)` - The base has no separator or the link is blank
///
/// # Examples
///
/// ```
/// use frontier_bench::url::resolve_link;
///
/// let next = resolve_link("http://h/page_0.html", "page_1.html").unwrap();
/// assert_eq!(next, "http://h/page_1.html");
/// ```
pub fn resolve_link(base: &str, link: &str) -> Result<String, ResolveError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(ResolveError::EmptyLink);
    }

    let dir = directory_of(base)?;
    let mut absolute = String::with_capacity(dir.len() + link.len());
    absolute.push_str(dir);
    absolute.push_str(link);
    Ok(absolute)
}
