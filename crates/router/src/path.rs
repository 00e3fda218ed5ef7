//! URL path normalization used before a case-insensitive route lookup.

/// Returns the canonical form of a URL path.
///
/// The following rules are applied until no further processing can be done:
/// 1. Replace multiple slashes with a single slash.
/// 2. Eliminate each `.` path name element (the current directory).
/// 3. Eliminate each inner `..` path name element (the parent directory)
///    along with the non-`..` element that precedes it.
/// 4. Eliminate `..` elements that begin a rooted path,
///    that is, replace `/..` by `/` at the beginning of a path.
///
/// The result always begins with `/`. A trailing slash is kept when the input
/// ends with `/` or with a `.` element, unless the result is the root.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }

    let mut trailing = path.len() > 1 && path.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();

    let mut elements = path.split('/').peekable();
    while let Some(element) = elements.next() {
        match element {
            "" => {}
            "." => trailing |= elements.peek().is_none(),
            ".." => {
                segments.pop();
            }
            element => segments.push(element),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() || trailing {
        cleaned.push('/');
    }
    cleaned
}
