//! Console strategy implementation

use crate::core::{Result, Strategy};
use colored::{Color, Colorize};
use std::io::Write;

/// Standard stream a console strategy writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Writes each payload as one console line.
pub struct ConsoleStrategy {
    target: ConsoleTarget,
    color: Option<Color>,
}

impl ConsoleStrategy {
    pub fn new() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
            color: None,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            color: None,
        }
    }

    /// Tint every line with `color`
    ///
    /// # Example
    ///
    /// ```
    /// use alog::strategies::ConsoleStrategy;
    /// use alog::Severity;
    ///
    /// let strategy = ConsoleStrategy::new().with_color(Severity::Error.color_code());
    /// ```
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn render(&self, buf: &[u8]) -> String {
        let text = String::from_utf8_lossy(buf);
        let line = text.strip_suffix('\n').unwrap_or(&text[..]);
        match self.color {
            Some(color) => format!("{}\n", line.color(color)),
            None => format!("{}\n", line),
        }
    }
}

impl Default for ConsoleStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for ConsoleStrategy {
    fn write(&self, buf: &[u8]) -> Result<usize> {
        let line = self.render(buf);
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(line.as_bytes())?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(line.as_bytes())?,
        }
        Ok(buf.len())
    }

    fn flush(&self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_reports_full_length() {
        let strategy = ConsoleStrategy::new();
        assert_eq!(strategy.write(b"Hello, Alog!").expect("write"), 12);
        assert!(strategy.flush().is_ok());
    }

    #[test]
    fn test_render_adds_single_newline() {
        let strategy = ConsoleStrategy::new();
        assert_eq!(strategy.render(b"line\n"), "line\n");
        assert_eq!(strategy.render(b"line"), "line\n");
    }

    #[test]
    fn test_stderr_target() {
        let strategy = ConsoleStrategy::stderr().with_color(Color::Red);
        assert_eq!(strategy.target(), ConsoleTarget::Stderr);
        assert!(strategy.write(b"to stderr").is_ok());
    }
}
