use std::borrow::Cow;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::style::icons;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

pub struct SpinnerBuilder {
    message: Cow<'static, str>,
    tick: Duration,
}

impl SpinnerBuilder {
    pub fn start(self) -> Spinner {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars(TICK_CHARS));
        }
        bar.set_message(self.message);
        bar.enable_steady_tick(self.tick);
        Spinner { bar }
    }
}

/// A single-line activity indicator on stderr. Hidden when stderr is not a
/// terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn builder(message: impl Into<Cow<'static, str>>) -> SpinnerBuilder {
        SpinnerBuilder {
            message: message.into(),
            tick: Duration::from_millis(80),
        }
    }

    /// Remove the spinner line.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    pub fn success(self, message: impl AsRef<str>) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", icons::success(), message.as_ref());
    }

    pub fn error(self, message: impl AsRef<str>) {
        self.bar.finish_and_clear();
        eprintln!("{} {}", icons::error(), message.as_ref());
    }
}
