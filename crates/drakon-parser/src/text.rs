//! Multi-line text helpers shared by heredocs and parameter labels.

/// Removes the smallest leading whitespace of the non-blank lines from every
/// line. Blank lines become empty.
pub(crate) fn strip_common_indent(lines: &[&str]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                line.chars().skip(indent).collect()
            }
        })
        .collect()
}

/// Normalizes free-form multi-line text.
///
/// Carriage returns are dropped, leading and trailing blank lines removed and
/// the common indentation stripped.
pub(crate) fn normalize_multiline(text: &str) -> String {
    let text = text.replace('\r', "");
    let lines: Vec<&str> = text.split('\n').collect();

    let first = lines.iter().position(|line| !line.trim().is_empty());
    let last = lines.iter().rposition(|line| !line.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };

    strip_common_indent(&lines[first..=last]).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_common_indent() {
        assert_eq!(
            strip_common_indent(&["    a", "", "  ", "      b"]),
            ["a", "", "", "  b"]
        );
        assert_eq!(strip_common_indent(&["a", " b"]), ["a", " b"]);
    }

    #[test]
    fn test_normalize_multiline() {
        assert_eq!(
            normalize_multiline("\r\n\n    order_id\r\n      nested\n    amount\n  \n"),
            "order_id\n  nested\namount"
        );
        assert_eq!(normalize_multiline("   \n  "), "");
        assert_eq!(normalize_multiline("single"), "single");
    }
}
