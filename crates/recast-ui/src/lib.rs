//! # recast-ui
//!
//! Spinners and styled status lines shared by the recast commands.
//!
//! ## Example
//!
//! ```rust,no_run
//! use recast_ui::{Spinner, Style, StyledText};
//!
//! let spinner = Spinner::builder("Offset.ts: Adjusting").start();
//! // ... do work ...
//! spinner.finish();
//! eprintln!("{} {}", recast_ui::icons::success(), "Offset.ts".with_style(Style::Green));
//! ```

mod spinner;
mod style;

pub use spinner::{Spinner, SpinnerBuilder};
pub use style::{Style, StyledText, icons};

// Re-export commonly used items from dependencies
pub use colored::Colorize;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Colorize,
        spinner::{Spinner, SpinnerBuilder},
        style::{Style, StyledText},
    };
}
