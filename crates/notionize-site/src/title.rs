//! Fallback titles derived from file names.

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// ```
/// use notionize_site::titlecase_from_slug;
///
/// assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
/// assert_eq!(titlecase_from_slug("api_reference"), "Api Reference");
/// ```
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Title for a page path: the directory name for `index.html`, else the file stem.
///
/// Returns `None` for the site root's `index.html`.
pub(crate) fn title_from_path(path: &str) -> Option<String> {
    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
    let slug = match file.strip_suffix(".html").unwrap_or(file) {
        "index" => dir.rsplit('/').next().unwrap_or(dir),
        stem => stem,
    };
    let title = titlecase_from_slug(slug);
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_titlecase_from_slug() {
        assert_eq!(titlecase_from_slug("getting-started"), "Getting Started");
        assert_eq!(titlecase_from_slug("a--b"), "A B");
        assert_eq!(titlecase_from_slug(""), "");
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path("setup-guide.html").as_deref(), Some("Setup Guide"));
        assert_eq!(title_from_path("guide/index.html").as_deref(), Some("Guide"));
        assert_eq!(
            title_from_path("a/user_manual/index.html").as_deref(),
            Some("User Manual")
        );
        assert_eq!(title_from_path("a/b/faq.html").as_deref(), Some("Faq"));
        assert_eq!(title_from_path("drafts").as_deref(), Some("Drafts"));
        assert_eq!(title_from_path("index.html"), None);
    }
}
