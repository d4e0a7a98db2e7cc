//! Render a whole directory as one string for snapshot assertions.
//! - Respects `.gitignore` and `.ignore` files
//! - Only includes UTF-8 text files (CRLF→LF), ignores binary files
//! - Deterministic path order

use ignore::WalkBuilder;
use std::{fs, io::Read, path::Path};

/// Every text file under `root` as `=== <relative path>` followed by its
/// contents, sorted by path.
pub fn dir_manifest(root: impl AsRef<Path>) -> String {
    let base = fs::canonicalize(root.as_ref()).expect("failed to canonicalize root path");

    // Gitignore-aware file walker, but deterministic and confined to `base`
    let mut wb = WalkBuilder::new(&base);
    wb.hidden(true)
        .git_ignore(true) // Respect .gitignore files
        .ignore(true) // Respect .ignore files
        .git_exclude(true) // Keep host-independent
        .git_global(false) // No global git config
        .parents(false); // Don't traverse up directory tree

    let mut entries: Vec<(String, String)> = Vec::new();

    for dent in wb.build().filter_map(Result::ok) {
        let p = dent.path();
        if p == base {
            continue;
        }

        let Some(ft) = dent.file_type() else { continue };
        if !ft.is_file() {
            continue;
        }

        let rel = p
            .strip_prefix(&base)
            .expect("path should be within base")
            .to_string_lossy()
            .replace('\\', "/");

        let mut buf = Vec::new();
        fs::File::open(p)
            .expect("failed to open file")
            .read_to_end(&mut buf)
            .expect("failed to read file");

        // Only include UTF-8 files, ignore non-UTF-8 files
        if let Ok(s) = std::str::from_utf8(&buf) {
            let mut body = s.replace("\r\n", "\n");
            if !body.ends_with('\n') {
                body.push('\n');
            }
            entries.push((rel, body));
        }
    }

    // Stable order
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (rel, body) in entries {
        out.push_str(&format!("=== {rel}\n"));
        out.push_str(&body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_is_sorted_and_newline_terminated() {
        let dir = assert_fs::TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("b/two.ts"), "two").unwrap();
        fs::write(dir.path().join("one.ts"), "one\r\n").unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();

        assert_eq!(dir_manifest(dir.path()), "=== b/two.ts\ntwo\n=== one.ts\none\n");
    }
}
