//! The core diagnostic type.

use std::fmt;

use crate::{
    Span,
    error::{ErrorCode, Label, Severity},
};

/// A single error or warning with source locations and optional help.
///
/// Messages keep the user-facing wording of the DRAKON editor, for example
/// `Unexpected token "}" at line 4.` or `Duplicate node id "a".`, so they read
/// the same with or without the source snippet.
///
/// ```text
/// error[E301]: Duplicate node id "check".
///   --> flow.drakon:9:3
///    |
///  9 |   action "check" { text = "Again" }
///    |   ^^^^^^^^^^^^^^ duplicate definition
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Adds a primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Adds a secondary label.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns the same diagnostic downgraded to a warning.
    pub fn into_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_defaults() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("Duplicate node id \"a\".")
            .with_code(ErrorCode::E301)
            .with_label(Span::new(30..40), "duplicate definition")
            .with_secondary_label(Span::new(5..15), "first defined here")
            .with_help("give each block a unique first label");

        assert_eq!(diag.code(), Some(ErrorCode::E301));
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("give each block a unique first label"));
    }

    #[test]
    fn test_diagnostic_display() {
        let with_code = Diagnostic::error("Unexpected character \"$\" at line 1, column 3.")
            .with_code(ErrorCode::E002);
        assert_eq!(
            with_code.to_string(),
            "error[E002]: Unexpected character \"$\" at line 1, column 3."
        );
        assert_eq!(Diagnostic::warning("odd").to_string(), "warning: odd");
    }

    #[test]
    fn test_into_warning_keeps_code() {
        let diag = Diagnostic::error("bad").with_code(ErrorCode::E100).into_warning();
        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::E100));
    }
}
