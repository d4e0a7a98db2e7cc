use anyhow::{Result, bail};
use ignore::WalkBuilder;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which discovered files take part in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    extension: String,
}

impl FileFilter {
    /// Files whose extension is exactly `ext` (a leading `.` is ignored).
    pub fn extension(ext: impl AsRef<str>) -> Self {
        Self {
            extension: ext.as_ref().trim_start_matches('.').to_string(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }
}

impl fmt::Display for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*.{}", self.extension)
    }
}

/// Walk `root` and process matching files with a callback
///
/// Features:
/// - Always recursive traversal
/// - Respects git ignore patterns and `.recastignore` files
/// - Filters with `filter`
pub fn walk_files<F>(
    root: &Path,
    filter: &FileFilter,
    hidden: bool,
    mut processor: F,
) -> Result<usize>
where
    F: FnMut(&Path) -> Result<()>,
{
    if !root.is_dir() {
        bail!("{} does not exist or is not a directory", root.display());
    }

    let mut found_files = 0;
    let mut builder = WalkBuilder::new(root);

    builder
        .hidden(!hidden)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(true)
        .add_custom_ignore_filename(".recastignore");

    for result in builder.build() {
        let entry = result?;
        let path = entry.path();

        if path.is_file() && filter.matches(path) {
            processor(path)?;
            found_files += 1;
        }
    }

    Ok(found_files)
}

/// Walk `root` and collect matching file paths into a Vec
///
/// The whole set is gathered before anything is processed, and is returned
/// sorted so runs are reproducible.
pub fn collect_files(root: &Path, filter: &FileFilter, hidden: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_files(root, filter, hidden, |path| {
        files.push(path.to_path_buf());
        Ok(())
    })?;
    files.sort(); // Deterministic ordering
    Ok(files)
}
