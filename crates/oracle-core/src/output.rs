//! Output sink abstraction.
//!
//! Everything the session shows the dreamer goes through [`OutputSink`], so the
//! session logic never touches terminal state directly.

/// Color family of a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    /// The Oracle's own voice.
    Oracle,
    Mystic,
    Success,
    Warning,
    Error,
    Menu,
}

/// How a piece of output should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub tone: Tone,
    pub bold: bool,
    /// Revealed character by character instead of printed at once.
    pub typed: bool,
}

impl Style {
    pub const fn new(tone: Tone) -> Self {
        Self {
            tone,
            bold: false,
            typed: false,
        }
    }

    pub const fn plain() -> Self {
        Self::new(Tone::Plain)
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn typed(mut self) -> Self {
        self.typed = true;
        self
    }
}

/// Destination for user-visible text. Each call writes one line.
pub trait OutputSink {
    fn write(&mut self, text: &str, style: Style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_builders() {
        let style = Style::new(Tone::Oracle).bold().typed();
        assert_eq!(style.tone, Tone::Oracle);
        assert!(style.bold);
        assert!(style.typed);
        assert!(!Style::plain().typed);
    }
}
