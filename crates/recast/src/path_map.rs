use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Destination of `relative` (a path under `source_root`) when the tree is
/// mirrored under `dest_root`.
///
/// Pure: only the arguments are consulted, never the filesystem. An absolute
/// `relative` under `source_root` has the root stripped first. Source and
/// destination roots may be the same, which maps every file onto itself.
pub fn map(source_root: &Path, dest_root: &Path, relative: &Path) -> PathBuf {
    let relative = if relative.is_absolute() {
        relative.strip_prefix(source_root).unwrap_or(relative)
    } else {
        relative
    };

    let mut dest = dest_root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::ParentDir => dest.push(component),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    dest
}

/// `path` with every `.` component dropped, so `./formatted` and `formatted`
/// compare equal. Lexical only: `..` and symlinks are left alone.
pub fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Path of a discovered file relative to the root it was found under.
pub fn relative_to(source_root: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(source_root)
        .map(Path::to_path_buf)
        .with_context(|| {
            format!(
                "{} is not under {}",
                path.display(),
                source_root.display()
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mirrors_relative_structure() {
        assert_eq!(
            map(
                Path::new("translated"),
                Path::new("formatted"),
                Path::new("R3/Geometry/Offset.ts")
            ),
            PathBuf::from("formatted/R3/Geometry/Offset.ts")
        );
    }

    #[test]
    fn same_roots_map_in_place() {
        let root = Path::new("/work/translated");
        let rel = Path::new("Math/Vector.ts");
        assert_eq!(map(root, root, rel), root.join(rel));
    }

    #[test]
    fn accepts_prefixed_and_dotted_paths() {
        let source = Path::new("/work/translated");
        let dest = Path::new("out");
        assert_eq!(
            map(source, dest, Path::new("/work/translated/a/b.ts")),
            PathBuf::from("out/a/b.ts")
        );
        assert_eq!(
            map(source, dest, Path::new("./a/./b.ts")),
            PathBuf::from("out/a/b.ts")
        );
        // A relative path whose first segment repeats the root name is kept.
        assert_eq!(
            map(Path::new("src"), dest, Path::new("src/lib.ts")),
            PathBuf::from("out/src/lib.ts")
        );
    }

    #[test]
    fn normalize_drops_current_dir() {
        assert_eq!(normalize(Path::new("./formatted")), PathBuf::from("formatted"));
        assert_eq!(normalize(Path::new("a/./b/")), PathBuf::from("a/b"));
        assert_eq!(normalize(Path::new("/w/./x")), PathBuf::from("/w/x"));
        assert_eq!(normalize(Path::new("../out")), PathBuf::from("../out"));
        assert_eq!(normalize(Path::new(".")), PathBuf::new());
    }

    #[test]
    fn relative_to_strips_root() {
        let rel = relative_to(Path::new("/src"), Path::new("/src/x/y.ts")).unwrap();
        assert_eq!(rel, PathBuf::from("x/y.ts"));
        assert!(relative_to(Path::new("/src"), Path::new("/other/y.ts")).is_err());
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_][A-Za-z0-9_.-]{0,11}"
    }

    proptest! {
        #[test]
        fn keeps_trailing_segments_under_dest(
            segments in prop::collection::vec(segment(), 1..6),
            source in prop::sample::select(vec!["src", "./src", "/abs/src", "/abs/src/"]),
            dest in prop::sample::select(vec!["out", "../out", "/abs/out", "/abs/src"]),
        ) {
            let relative: PathBuf = segments.iter().collect();
            let mapped = map(Path::new(source), Path::new(dest), &relative);

            prop_assert!(mapped.starts_with(dest));
            prop_assert!(mapped.ends_with(&relative));
            prop_assert_eq!(
                mapped.components().count(),
                Path::new(dest).components().count() + segments.len()
            );
            // Pure: the same inputs always give the same answer.
            prop_assert_eq!(mapped, map(Path::new(source), Path::new(dest), &relative));
        }
    }
}
