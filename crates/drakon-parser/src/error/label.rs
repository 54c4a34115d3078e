//! Labeled source spans for diagnostic messages.

use crate::Span;

/// A message attached to a span of the source text.
///
/// A diagnostic usually has one primary label marking the problem and
/// optional secondary labels for context, such as where a duplicated node id
/// was first defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(3..9), "here");
        let secondary = Label::secondary(Span::new(0..2), "first defined here");

        assert!(primary.is_primary());
        assert_eq!(primary.span().start(), 3);
        assert!(secondary.is_secondary());
        assert_eq!(secondary.message(), "first defined here");
    }
}
