use regex::Regex;

lazy_static::lazy_static! {
    /// `./{slug}/+page.md`, where the slug may span nested directories.
    static ref PAGE_PATH_REGEX: Regex = Regex::new(r"^\./(.+)/\+page\.md$").unwrap();
}

/// Slug of a post from its content-relative path, if the path has one.
pub fn slug_from_path(path: &str) -> Option<&str> {
    PAGE_PATH_REGEX
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
