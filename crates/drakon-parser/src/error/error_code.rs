//! Error codes for the DRAKON diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Tokenizer errors
//! - `E1xx` - Parser errors
//! - `E3xx` - Diagram builder errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Tokenizer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with `"` or `'` but the document ended first.
    E001,

    /// Unexpected character.
    ///
    /// The character cannot start any token and was skipped.
    E002,

    /// Unterminated escape sequence.
    ///
    /// The document ended right after a backslash inside a string.
    E003,

    /// Unterminated heredoc.
    ///
    /// A `<<MARKER` heredoc was never closed by a line holding only `MARKER`.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser found a token that cannot appear here and skipped it.
    E100,

    /// Unexpected value.
    ///
    /// The token after `=` cannot start an attribute value.
    E101,

    // =========================================================================
    // Builder Errors (E3xx)
    // =========================================================================
    /// Missing root block.
    ///
    /// The document has no top-level `drakon { ... }` block. This is the only
    /// error that prevents a diagram from being built.
    E300,

    /// Duplicate node id.
    ///
    /// Two blocks resolved to the same node id; the later one is dropped.
    E301,

    /// Unknown reference.
    ///
    /// A `from`, `to`, `target`, `attaches_to` or `next` reference does not
    /// name a node id, label or anchor.
    E302,

    /// Invalid reference value.
    ///
    /// A reference attribute is missing, empty or not a string.
    E303,

    /// Reserved block declared explicitly.
    ///
    /// Blocks such as `start`, `end` or `parameters` are synthesized by the
    /// builder and cannot be written as content.
    E304,

    /// Block not supported here.
    ///
    /// The block type is not allowed at this nesting level, for example a
    /// `line` inside a lane.
    E305,

    /// Malformed question branch.
    ///
    /// A question declared both `yes` and `no`, or a branch is not a
    /// non-empty list of blocks.
    E306,

    /// Branch produced no nodes.
    ///
    /// A question branch contained blocks but none of them became a node.
    E307,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Tokenizer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Builder errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
            ErrorCode::E306 => "E306",
            ErrorCode::E307 => "E307",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Tokenizer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "unterminated escape sequence",
            ErrorCode::E004 => "unterminated heredoc",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected value",
            // Builder errors
            ErrorCode::E300 => "missing drakon block",
            ErrorCode::E301 => "duplicate node id",
            ErrorCode::E302 => "unknown reference",
            ErrorCode::E303 => "invalid reference value",
            ErrorCode::E304 => "reserved block",
            ErrorCode::E305 => "unsupported block",
            ErrorCode::E306 => "malformed question branch",
            ErrorCode::E307 => "empty branch",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
