use colored::{ColoredString, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Green,
    Yellow,
    Blue,
}

/// Apply a [`Style`] to anything printable.
pub trait StyledText {
    fn with_style(&self, style: Style) -> ColoredString;
}

impl<T: AsRef<str> + ?Sized> StyledText for T {
    fn with_style(&self, style: Style) -> ColoredString {
        let text = self.as_ref();
        match style {
            Style::Green => text.green(),
            Style::Yellow => text.yellow(),
            Style::Blue => text.blue(),
        }
    }
}

pub mod icons {
    use colored::{ColoredString, Colorize};

    pub fn success() -> ColoredString {
        "✓".green()
    }

    pub fn warning() -> ColoredString {
        "!".yellow()
    }

    pub fn error() -> ColoredString {
        "✗".red()
    }
}
