//! Canonical formatting for adjusted sources.
//!
//! Formatting is delegated to `prettier`, run as a child process with the
//! source on stdin. The options it is given live in a [`FormatConfig`], which
//! this crate passes through without interpreting.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use similar::TextDiff;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("prettier was not found on PATH")]
    NotInstalled,

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("prettier exited with status {}: {stderr}", display_code(.code))]
    Failed { code: Option<i32>, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format config: {0}")]
    Config(#[from] serde_json::Error),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
}

/// Named formatter options, written verbatim as a prettier config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatConfig {
    options: Map<String, Value>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::empty()
            .with_option("tabWidth", 2)
            .with_option("singleQuote", true)
            .with_option("printWidth", 100)
            .with_option("trailingComma", "all")
            .with_option("endOfLine", "lf")
            .with_option("importOrder", json!(["^@(.*)$", "^[./]"]))
            .with_option("importOrderSeparation", true)
    }
}

impl FormatConfig {
    pub fn empty() -> Self {
        Self {
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }
}

/// Something that turns source text into its canonical form.
pub trait SourceFormatter {
    /// Format `source`. `path` is a hint used to pick the language; the file
    /// is never read.
    fn format_source(&self, path: &Path, source: &str) -> Result<String, FormatError>;

    /// Whether formatting would change `source`.
    fn needs_formatting(&self, path: &Path, source: &str) -> Result<bool, FormatError> {
        Ok(self.format_source(path, source)? != source)
    }

    /// Unified diff from `source` to its formatted form; empty when unchanged.
    fn diff(&self, path: &Path, source: &str) -> Result<String, FormatError> {
        let formatted = self.format_source(path, source)?;
        if formatted == source {
            return Ok(String::new());
        }
        let diff = TextDiff::from_lines(source, formatted.as_str());
        Ok(format!(
            "{}",
            diff.unified_diff().context_radius(3).header(
                &format!("old/{}", path.display()),
                &format!("new/{}", path.display())
            )
        ))
    }
}

pub struct PrettierFormatter {
    program: PathBuf,
    // Kept alive for as long as the formatter; removed on drop.
    config_file: NamedTempFile,
}

impl PrettierFormatter {
    /// Use the `prettier` found on `PATH`.
    pub fn new(config: FormatConfig) -> Result<Self, FormatError> {
        let program = which::which("prettier").map_err(|_| FormatError::NotInstalled)?;
        Self::with_program(program, config)
    }

    pub fn with_program(
        program: impl Into<PathBuf>,
        config: FormatConfig,
    ) -> Result<Self, FormatError> {
        let mut config_file = tempfile::Builder::new()
            .prefix("recast-prettier-")
            .suffix(".json")
            .tempfile()?;
        serde_json::to_writer_pretty(&mut config_file, &config)?;
        config_file.flush()?;

        let program = program.into();
        debug!(
            "Using {} with config {}",
            program.display(),
            config_file.path().display()
        );

        Ok(Self {
            program,
            config_file,
        })
    }
}

impl SourceFormatter for PrettierFormatter {
    fn format_source(&self, path: &Path, source: &str) -> Result<String, FormatError> {
        let args: Vec<OsString> = vec![
            "--config".into(),
            self.config_file.path().into(),
            "--no-editorconfig".into(),
            "--stdin-filepath".into(),
            path.into(),
        ];

        let output = duct::cmd(&self.program, args)
            .stdin_bytes(source.to_owned())
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(classify_failure(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
            ))
        }
    }
}

/// Map a failed prettier run to an error. Syntax errors are reported as
/// `[error] <path>: SyntaxError: ...` on stderr.
pub fn classify_failure(code: Option<i32>, stderr: &str) -> FormatError {
    if let Some(line) = stderr.lines().find(|l| l.contains("SyntaxError")) {
        let message = line.trim().trim_start_matches("[error]").trim().to_string();
        return FormatError::Parse { message };
    }
    FormatError::Failed {
        code,
        stderr: stderr.trim().to_string(),
    }
}
