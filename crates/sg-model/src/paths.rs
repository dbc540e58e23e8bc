//! Pure slug and path utilities.
//!
//! The path-joining collaborator consumed by the routing resolver and by
//! callers that derive request paths from ancestor slugs. Paths use a leading
//! slash and no trailing slash; the root path is `"/"`.

/// Join ancestor slugs into a request path.
///
/// Empty segments are skipped so that a slugless root node does not produce
/// a double slash.
///
/// Examples:
/// - `[]` -> `"/"`
/// - `["blog"]` -> `"/blog"`
/// - `["blog", "post-1"]` -> `"/blog/post-1"`
pub fn join_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Derive a URL-safe slug from a display title.
///
/// Lowercases, maps every non-alphanumeric run to a single hyphen, and trims
/// leading/trailing hyphens. An all-symbol title yields an empty slug; the
/// caller decides the fallback.
#[must_use]
pub fn to_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
