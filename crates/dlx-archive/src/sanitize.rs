use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Drop the first `count` `/`-separated segments of an entry name.
///
/// Returns `None` when nothing would remain, meaning the entry is skipped.
/// A zero count returns the name untouched. On Windows backslashes count as
/// separators too.
pub fn strip_components(name: &str, count: usize) -> Option<String> {
    if count == 0 {
        return Some(name.to_owned());
    }

    let name = to_slash(name);
    let segments: Vec<&str> = name.split('/').collect();
    if count >= segments.len() {
        return None;
    }

    let stripped = segments[count..].join("/");
    (!stripped.is_empty()).then_some(stripped)
}

#[cfg(windows)]
fn to_slash(name: &str) -> Cow<'_, str> { Cow::Owned(name.replace('\\', "/")) }

#[cfg(not(windows))]
fn to_slash(name: &str) -> Cow<'_, str> { Cow::Borrowed(name) }

/// Lexically normalize a path: drop `.`, fold `..` into its parent, collapse
/// repeated separators.
///
/// `..` directly below the root stays at the root. Leading `..` of a
/// relative path are kept. The empty path cleans to `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => cleaned.push(prefix.as_os_str()),
            Component::RootDir => cleaned.push(Component::RootDir),
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            Component::Normal(part) => cleaned.push(part),
        }
    }

    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Join an archive-relative `name` onto `root` and clean the result.
///
/// A leading separator or drive prefix in `name` never replaces `root`;
/// the name is always taken relative to it.
pub fn join_clean(root: &Path, name: &str) -> PathBuf {
    let mut joined = root.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other),
        }
    }
    clean_path(&joined)
}

/// Whether `candidate` is `root` itself or lies below it.
///
/// Both paths are cleaned first. The comparison is component-wise, so
/// `/dest-evil` is not inside `/dest`.
pub fn is_path_safe(candidate: &Path, root: &Path) -> bool {
    clean_path(candidate).starts_with(clean_path(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/opt/dest")
        } else {
            Path::new("/opt/dest")
        }
    }

    #[test]
    fn strip_zero_is_identity() {
        assert_eq!(strip_components("a/b/c", 0).as_deref(), Some("a/b/c"));
        assert_eq!(strip_components("", 0).as_deref(), Some(""));
        assert_eq!(strip_components("/abs/path", 0).as_deref(), Some("/abs/path"));
    }

    #[test]
    fn strip_leading_segments() {
        assert_eq!(strip_components("pkg-1.0/bin/tool", 1).as_deref(), Some("bin/tool"));
        assert_eq!(strip_components("a/b/c/d", 2).as_deref(), Some("c/d"));
    }

    #[test]
    fn strip_boundary() {
        assert_eq!(strip_components("a/b/c", 3), None);
        assert_eq!(strip_components("a/b/c", 4), None);
        assert_eq!(strip_components("a/b/c", 2).as_deref(), Some("c"));
    }

    #[test]
    fn strip_directory_entry_to_nothing() {
        // "top/" splits into ["top", ""]
        assert_eq!(strip_components("top/", 1), None);
        assert_eq!(strip_components("top/sub/", 1).as_deref(), Some("sub/"));
    }

    #[test]
    fn strip_keeps_parent_segments() {
        assert_eq!(strip_components("x/../../etc", 1).as_deref(), Some("../../etc"));
    }

    #[test]
    fn clean_folds_parents() {
        assert_eq!(clean_path(Path::new("a/./b/../c")), Path::new("a/c"));
        assert_eq!(clean_path(Path::new("../a/..")), Path::new(".."));
        assert_eq!(clean_path(Path::new("a/..")), Path::new("."));
        assert_eq!(clean_path(Path::new("")), Path::new("."));
        assert_eq!(clean_path(Path::new("foo//bar/")), Path::new("foo/bar"));
    }

    #[cfg(unix)]
    #[test]
    fn clean_stops_at_root() {
        assert_eq!(clean_path(Path::new("/../../etc")), Path::new("/etc"));
        assert_eq!(clean_path(Path::new("/opt/dest/../../x")), Path::new("/x"));
    }

    #[test]
    fn join_treats_absolute_names_as_relative() {
        let joined = join_clean(test_base_path(), "/etc/passwd");
        assert_eq!(joined, test_base_path().join("etc/passwd"));
    }

    #[test]
    fn traversal_is_unsafe() {
        let base = test_base_path();
        assert!(!is_path_safe(&join_clean(base, "../../etc/passwd"), base));
        assert!(!is_path_safe(&join_clean(base, "a/../../b"), base));
        assert!(is_path_safe(&join_clean(base, "a/../b"), base));
        assert!(is_path_safe(&join_clean(base, "."), base));
    }

    #[test]
    fn sibling_prefix_is_unsafe() {
        let base = test_base_path();
        let sibling = base.with_file_name("dest-evil").join("file");
        assert!(!is_path_safe(&sibling, base));
    }

    #[test]
    fn root_is_safe() {
        assert!(is_path_safe(test_base_path(), test_base_path()));
    }

    proptest! {
        #[test]
        fn joined_names_never_escape(name in "[a-z./]{0,24}") {
            let base = test_base_path();
            let joined = join_clean(base, &name);
            prop_assert_eq!(is_path_safe(&joined, base), joined.starts_with(base));
            if !name.contains("..") {
                prop_assert!(is_path_safe(&joined, base));
            }
        }

        #[test]
        fn strip_output_has_fewer_segments(name in "[a-z]{1,4}(/[a-z]{1,4}){0,5}", count in 0usize..8) {
            let total = name.split('/').count();
            match strip_components(&name, count) {
                Some(rest) => {
                    prop_assert!(count < total);
                    prop_assert_eq!(rest.split('/').count(), total - count);
                    prop_assert!(name.ends_with(&rest));
                }
                None => prop_assert!(count >= total),
            }
        }
    }
}
