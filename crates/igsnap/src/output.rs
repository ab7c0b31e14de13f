//! Colored terminal output on stderr.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// Width of the label column in [`Output::field`] rows.
const LABEL_WIDTH: usize = 18;

/// Terminal output for command results.
///
/// Everything goes to stderr; stdout stays free for piping.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    heading: Style,
    label: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            heading: Style::new().cyan().bold(),
            label: Style::new().dim(),
        }
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.red.apply_to(msg).to_string());
    }

    pub(crate) fn heading(&self, msg: &str) {
        self.line(&self.heading.apply_to(msg).to_string());
    }

    /// Print an aligned `label  value` row.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = format!("  {label:<LABEL_WIDTH$}");
        self.line(&format!("{}{value}", self.label.apply_to(label)));
    }

    /// Print a row whose value is a file or directory.
    pub(crate) fn path(&self, label: &str, path: &Path) {
        self.field(label, path.display());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
