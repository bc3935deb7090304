use std::fmt;

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        }
    }
}

/// Byte range into scenario text plus its 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte index (inclusive).
    pub start: usize,
    /// The ending byte index (exclusive).
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// Build a span for `start..end` of `src`, computing line and column.
    pub fn in_source(src: &str, start: usize, end: usize) -> Self {
        let start = start.min(src.len());
        let end = end.clamp(start, src.len());
        let before = &src[..start];
        let line = before.matches('\n').count() as u32 + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = src[line_start..start].chars().count() as u32 + 1;
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// A problem found in scenario text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error<S: Into<String>>(span: Span, message: S) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn warning<S: Into<String>>(span: Span, message: S) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn note<S: Into<String>>(span: Span, message: S) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            span,
            help: None,
        }
    }

    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {}, col {})",
            self.severity.label(),
            self.message,
            self.span.line,
            self.span.column
        )
    }
}

pub fn has_errors(diags: &[Diagnostic]) -> bool {
    diags.iter().any(|d| d.severity == Severity::Error)
}

/// Render a diagnostic with the offending source line and an underline.
pub fn render_snippet(diag: &Diagnostic, src: &str) -> String {
    let line_no = diag.span.line.max(1);
    let text = src.lines().nth((line_no - 1) as usize).unwrap_or("");
    let gutter = line_no.to_string();
    let pad = " ".repeat(gutter.len());

    let col = diag.span.column.max(1) as usize;
    let width = src
        .get(diag.span.start..diag.span.end)
        .map(|s| s.lines().next().unwrap_or("").chars().count())
        .unwrap_or(0);
    let underline = if width <= 1 {
        "^".to_string()
    } else {
        format!("^{}", "~".repeat(width - 1))
    };

    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", diag.severity.label(), diag.message));
    out.push_str(&format!("{pad} --> line {}, col {}\n", line_no, col));
    out.push_str(&format!("{pad} |\n"));
    out.push_str(&format!("{gutter} | {text}\n"));
    out.push_str(&format!("{pad} | {}{}\n", " ".repeat(col - 1), underline));
    if let Some(help) = &diag.help {
        out.push_str(&format!("{pad} = help: {help}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_tracks_lines_and_columns() {
        let src = "a = 1\nbb = x";
        let span = Span::in_source(src, 11, 12);
        assert_eq!(span.line, 2);
        assert_eq!(span.column, 6);
    }

    #[test]
    fn snippet_has_caret_for_single_char() {
        let src = "wind_factor = ?";
        let d = Diagnostic::error(Span::in_source(src, 14, 15), "expected a value");
        let s = render_snippet(&d, src);
        assert!(s.contains("error: expected a value"));
        assert!(s.contains(" --> line 1, col 15"));
        assert!(s.contains("1 | wind_factor = ?"));
        assert!(s.contains("^"));
    }

    #[test]
    fn snippet_has_tildes_and_help() {
        let src = "x = 1\nwindfactor = 2";
        let d = Diagnostic::warning(Span::in_source(src, 6, 16), "unknown factor 'windfactor'")
            .with_help("did you mean 'wind_factor'?");
        let s = render_snippet(&d, src);
        assert!(s.starts_with("warning:"));
        assert!(s.contains("2 | windfactor = 2"));
        assert!(s.contains("^~~~~~~~~"));
        assert!(s.contains("= help: did you mean 'wind_factor'?"));
    }
}
