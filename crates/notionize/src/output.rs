//! Colored terminal output.

use console::{Style, Term};

/// Styling of a printed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Plain,
    /// Green.
    Success,
    /// Yellow.
    Warning,
    /// Red.
    Error,
    /// Cyan bold.
    Heading,
    /// Dimmed.
    Detail,
}

impl Tone {
    fn style(self) -> Style {
        let style = Style::new();
        match self {
            Self::Plain => style,
            Self::Success => style.green(),
            Self::Warning => style.yellow(),
            Self::Error => style.red(),
            Self::Heading => style.cyan().bold(),
            Self::Detail => style.dim(),
        }
    }
}

/// User-facing messages on stderr. Diagnostics go through `tracing`.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Print one line; write failures are ignored.
    pub(crate) fn line(&self, tone: Tone, msg: &str) {
        let _ = self.term.write_line(&tone.style().apply_to(msg).to_string());
    }
}
