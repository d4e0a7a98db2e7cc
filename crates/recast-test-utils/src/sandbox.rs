//! sandbox.rs
//!
//! Hermetic filesystem sandbox for running the recast binary in tests.
//! - Everything lives under an `assert_fs::TempDir` and is cleaned up on drop
//! - Commands get a minimal environment (`PATH`, a private `HOME`, no color)
//! - Run arbitrary commands with `cmd()`, or cargo binaries with `run()`
//!
//! ## Quick example
//! ```no_run
//! use recast_test_utils::sandbox::Sandbox;
//!
//! let mut sb = Sandbox::new();
//! sb.write("translated/Offset.ts", "module R3 {\npublic x = 1;\n}\n");
//!
//! sb.run("recast", ["adjust", "translated"], None).unwrap();
//! assert_eq!(sb.read("translated/Offset.ts"), "x = 1;\n");
//! ```

use assert_fs::TempDir;
use assert_fs::fixture::PathChild;
use duct::Expression;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Sandbox {
    root: TempDir,
    pub home: PathBuf,
    default_cwd: PathBuf,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// Create a new sandbox; all state is under an auto-cleaned TempDir.
    pub fn new() -> Self {
        let root = TempDir::new().expect("create sandbox TempDir");
        let home = root.child("home").to_path_buf();
        fs::create_dir_all(&home).expect("create home dir");
        let default_cwd = root.path().to_path_buf();

        Self {
            root,
            home,
            default_cwd,
        }
    }

    /// Get the current default working directory for commands.
    pub fn default_cwd(&self) -> &Path {
        &self.default_cwd
    }

    /// Set the default working directory for commands. Path is relative to sandbox root if not absolute.
    pub fn set_default_cwd<P: AsRef<Path>>(&mut self, cwd: P) -> &mut Self {
        let cwd = cwd.as_ref();
        self.default_cwd = if cwd.is_absolute() {
            cwd.to_path_buf()
        } else {
            self.root_path().join(cwd)
        };
        self
    }

    /// Absolute path to the sandbox root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Write/overwrite a file relative to the sandbox root.
    pub fn write<P: AsRef<Path>, S: AsRef<[u8]>>(&mut self, rel: P, contents: S) -> &mut Self {
        let p = self.root_path().join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(p, contents).expect("write file");
        self
    }

    /// Read a UTF-8 file relative to the sandbox root.
    pub fn read<P: AsRef<Path>>(&self, rel: P) -> String {
        let p = self.root_path().join(rel);
        fs::read_to_string(&p).unwrap_or_else(|e| panic!("read {}: {e}", p.display()))
    }

    pub fn exists<P: AsRef<Path>>(&self, rel: P) -> bool {
        self.root_path().join(rel).exists()
    }

    /// Build a `duct::Expression` pre-wired with the sandbox env and default cwd.
    /// Useful for system binaries. You can chain `.dir()`, etc. and then `.run()` or `.read()`.
    pub fn cmd<S: AsRef<OsStr>, I: IntoIterator>(&self, program: S, args: I) -> Expression
    where
        I::Item: AsRef<OsStr>,
    {
        let program_str = program.as_ref().to_string_lossy();
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().to_string())
            .collect();
        let expr = duct::cmd(program_str.as_ref(), args).dir(&self.default_cwd);
        self.inject_env(expr)
    }

    /// Run a cargo binary inside this sandbox and return stdout as String.
    /// Errors if the process exits with non-zero status.
    pub fn run<I>(&self, program: &str, args: I, cwd: Option<&Path>) -> Result<String, String>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let working_dir = match cwd {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => self.root_path().join(dir),
            None => self.default_cwd.clone(),
        };

        self.cargo_bin(program, args)
            .dir(working_dir)
            .read()
            .map_err(|e| format!("command failed: {e}"))
    }

    /// Run a cargo binary and render its exit code, stdout and stderr as one
    /// string, with the sandbox root replaced by `<ROOT>`. Never fails on a
    /// non-zero exit, which makes it suitable for snapshotting error paths.
    pub fn snapshot_run<I>(&self, program: &str, args: I) -> String
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let output = self
            .cargo_bin(program, args)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()
            .expect("spawn cargo binary");

        let root = fs::canonicalize(self.root_path())
            .unwrap_or_else(|_| self.root_path().to_path_buf())
            .to_string_lossy()
            .into_owned();
        let scrub = |bytes: &[u8]| {
            String::from_utf8_lossy(bytes)
                .replace(&root, "<ROOT>")
                .replace(&*self.root_path().to_string_lossy(), "<ROOT>")
        };

        format!(
            "Exit Code: {}\n\n--- STDOUT ---\n{}\n--- STDERR ---\n{}",
            output.status.code().unwrap_or(-1),
            scrub(&output.stdout),
            scrub(&output.stderr)
        )
    }

    fn cargo_bin<I>(&self, program: &str, args: I) -> Expression
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        let cargo_bin_path = assert_cmd::cargo::cargo_bin(program)
            .to_string_lossy()
            .to_string();
        let args: Vec<_> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_string_lossy().to_string())
            .collect();

        let expr = duct::cmd(&cargo_bin_path, args).dir(&self.default_cwd);
        self.inject_env(expr)
    }

    pub fn inject_env(&self, mut expr: Expression) -> Expression {
        let mut env_map: HashMap<String, String> = HashMap::new();
        if let Ok(path) = std::env::var("PATH") {
            env_map.insert("PATH".into(), path);
        }
        env_map.insert("HOME".into(), self.home.to_string_lossy().into_owned());
        env_map.insert(
            "XDG_CONFIG_HOME".into(),
            self.home.to_string_lossy().into_owned(),
        );
        env_map.insert("NO_COLOR".into(), "1".into());

        expr = expr.full_env(&env_map);

        expr
    }
}
