//! Word wrapping of node labels.
//!
//! Explicit line breaks are kept. Each line is then filled word by word up
//! to the available width; a word that does not fit on a line of its own is
//! split at the longest prefix that fits, found by binary search.

use drakon_core::text::TextMeasure;

/// Wraps `label` into lines no wider than `max_width`.
///
/// Always returns at least one line. Blank source lines are kept as empty
/// lines.
pub fn wrap_label(label: &str, max_width: f32, measure: &dyn TextMeasure) -> Vec<String> {
    let mut wrapped = Vec::new();
    for line in label.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        wrapped.extend(wrap_line(line, max_width, measure));
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

fn wrap_line(line: &str, max_width: f32, measure: &dyn TextMeasure) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if !current.is_empty() {
            let candidate = format!("{current} {word}");
            if measure.measure_width(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            wrapped.push(std::mem::take(&mut current));
        }

        if measure.measure_width(word) <= max_width {
            current = word.to_string();
        } else {
            wrapped.extend(split_long_word(word, max_width, measure));
        }
    }

    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

/// Splits `word` into pieces that each fit `max_width`.
///
/// A piece holds at least one character, so a single glyph wider than the
/// limit still makes progress.
fn split_long_word(word: &str, max_width: f32, measure: &dyn TextMeasure) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut remaining: Vec<char> = word.chars().collect();

    while !remaining.is_empty() {
        let (mut low, mut high, mut best) = (1, remaining.len(), 1);
        while low <= high {
            let mid = (low + high) / 2;
            let candidate: String = remaining[..mid].iter().collect();
            if measure.measure_width(&candidate) <= max_width {
                best = mid;
                low = mid + 1;
            } else {
                high = mid - 1;
            }
        }
        pieces.push(remaining.drain(..best).collect());
    }
    pieces
}


#[cfg(test)]
mod proptest_tests {
    use drakon_core::text::FixedWidthMeasure;
    use proptest::prelude::*;

    use super::*;

    fn label_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec("[a-z]{1,12}", 0..12).prop_map(|words| words.join(" "))
    }

    /// Every produced line fits unless it is a single character.
    fn check_lines_fit(label: &str, max_width: f32) -> Result<(), TestCaseError> {
        let measure = FixedWidthMeasure::new(8.0);
        for line in wrap_label(label, max_width, &measure) {
            prop_assert!(
                measure.measure_width(&line) <= max_width || line.chars().count() == 1,
                "line {line:?} exceeds {max_width}"
            );
        }
        Ok(())
    }

    /// Wrapping only moves whitespace: the non-space characters survive in order.
    fn check_text_preserved(label: &str, max_width: f32) -> Result<(), TestCaseError> {
        let measure = FixedWidthMeasure::new(8.0);
        let wrapped = wrap_label(label, max_width, &measure);
        let expected: String = label.split_whitespace().collect();
        let rejoined: String = wrapped.iter().flat_map(|line| line.split_whitespace()).collect();
        prop_assert_eq!(expected, rejoined);
        prop_assert!(!wrapped.is_empty());
        Ok(())
    }

    proptest! {
        #[test]
        fn lines_fit(label in label_strategy(), max_width in 4.0f32..200.0) {
            check_lines_fit(&label, max_width)?;
        }

        #[test]
        fn text_preserved(label in label_strategy(), max_width in 4.0f32..200.0) {
            check_text_preserved(&label, max_width)?;
        }
    }
}
