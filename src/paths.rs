//! Path segment assembly for compiled routes.
//!
//! Module prefixes and method sub-paths are collected as plain segments while
//! the module tree is walked; only at registration time are they joined into
//! the final route path. Empty segments (a module or method that declares no
//! path of its own) simply disappear from the result instead of producing
//! double slashes.

/// Join path segments with `/`, dropping empty segments.
///
/// The segment order is preserved; leading and trailing slashes are not
/// added, so `join_segments(["", "a", "", "b"])` yields `"a/b"` and an
/// all-empty input yields `""`.
#[must_use]
pub fn join_segments<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(segment);
    }
    out
}

/// Build the absolute path a route is registered under.
///
/// This is `join_segments` with the leading `/` every registered route
/// carries. The all-empty join registers the root path `/`.
#[must_use]
pub fn route_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = join_segments(segments);
    let mut out = String::with_capacity(joined.len() + 1);
    out.push('/');
    out.push_str(&joined);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_drops_empty_segments() {
        assert_eq!(join_segments(["", "a", "", "b"]), "a/b");
        assert_eq!(join_segments(["a", "b", "c"]), "a/b/c");
    }

    #[test]
    fn test_join_empty_input() {
        assert_eq!(join_segments(Vec::<&str>::new()), "");
        assert_eq!(join_segments(["", ""]), "");
    }

    #[test]
    fn test_join_preserves_order() {
        assert_eq!(join_segments(["root", "", "stuff"]), "root/stuff");
        assert_eq!(join_segments(["stuff", "root"]), "stuff/root");
    }

    #[test]
    fn test_route_path_leading_slash() {
        assert_eq!(route_path(["root", "stuff"]), "/root/stuff");
        assert_eq!(route_path(["", ""]), "/");
        assert_eq!(route_path(Vec::<&str>::new()), "/");
    }
}
