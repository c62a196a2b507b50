//! Prefix and pattern concatenation.

/// Join a router prefix and a route pattern with exactly one slash between them.
///
/// A trailing slash is collapsed unless `strict` is set. The pattern `/` on its own
/// resolves to the prefix itself (or `/` when there is no prefix).
pub fn join_path(prefix: &str, pattern: &str, strict: bool) -> String {
    let prefix = prefix.trim_end_matches('/');

    if pattern == "/" {
        return match (prefix.is_empty(), strict) {
            (true, _) => "/".to_string(),
            (false, true) => with_leading_slash(format!("{prefix}/")),
            (false, false) => with_leading_slash(prefix.to_string()),
        };
    }

    let mut joined = with_leading_slash(format!("{prefix}/{}", pattern.trim_start_matches('/')));
    if !strict {
        while joined.len() > 1 && joined.ends_with('/') {
            joined.pop();
        }
    }
    joined
}

fn with_leading_slash(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}
