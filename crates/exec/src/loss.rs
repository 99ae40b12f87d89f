/// Text that introduces the loss in a command's output.
pub const LOSS_MARKER: &str = "average loss = ";

/// Extracts the loss from one output line.
///
/// Looks for [`LOSS_MARKER`] followed by a plain decimal number: digits with
/// at most one `.` and at least one digit. Signs and exponents are not part
/// of the number, and anything after it is ignored. If the marker appears
/// more than once, the first occurrence followed by a number wins.
#[must_use]
pub fn parse_loss_line(line: &str) -> Option<f64> {
    line.match_indices(LOSS_MARKER)
        .find_map(|(start, _)| leading_number(&line[start + LOSS_MARKER.len()..]))
}

/// Returns the loss from the last line that reports one.
#[must_use]
pub fn last_loss<S: AsRef<str>>(lines: &[S]) -> Option<f64> {
    lines
        .iter()
        .rev()
        .find_map(|line| parse_loss_line(line.as_ref()))
}

fn leading_number(text: &str) -> Option<f64> {
    let mut seen_dot = false;
    let len = text
        .char_indices()
        .find(|&(_, c)| match c {
            '0'..='9' => false,
            '.' if !seen_dot => {
                seen_dot = true;
                false
            }
            _ => true,
        })
        .map_or(text.len(), |(i, _)| i);

    let number = &text[..len];
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn reads_number_after_marker() {
        assert_eq!(parse_loss_line("average loss = 0.693147"), Some(0.693_147));
        assert_eq!(parse_loss_line("average loss = 12"), Some(12.0));
    }

    #[test]
    fn ignores_text_around_the_number() {
        let line = "pass 3: average loss = 0.25 h (holdout)";
        assert_eq!(parse_loss_line(line), Some(0.25));
    }

    #[test]
    fn accepts_leading_or_trailing_dot() {
        assert_eq!(parse_loss_line("average loss = .5"), Some(0.5));
        assert_eq!(parse_loss_line("average loss = 5."), Some(5.0));
    }

    #[test]
    fn stops_at_second_dot() {
        assert_eq!(parse_loss_line("average loss = 1.2.3"), Some(1.2));
    }

    #[test]
    fn exponent_is_not_part_of_the_number() {
        assert_eq!(parse_loss_line("average loss = 1.5e-3"), Some(1.5));
    }

    #[test]
    fn rejects_lines_without_a_number() {
        assert_eq!(parse_loss_line("average loss = n.a."), None);
        assert_eq!(parse_loss_line("average loss = ."), None);
        assert_eq!(parse_loss_line("average loss = -0.5"), None);
        assert_eq!(parse_loss_line("average loss ="), None);
        assert_eq!(parse_loss_line("loss = 0.5"), None);
        assert_eq!(parse_loss_line(""), None);
    }

    #[test]
    fn later_marker_on_the_same_line_is_used_if_first_has_no_number() {
        let line = "average loss = unknown; average loss = 0.4";
        assert_eq!(parse_loss_line(line), Some(0.4));
    }

    #[test]
    fn last_reporting_line_wins() {
        let lines = [
            "average loss = 0.9",
            "average loss = 0.5",
            "finished run",
            "average loss = 0.3",
            "total feature number = 12",
        ];

        assert_relative_eq!(last_loss(&lines).unwrap(), 0.3);
    }

    #[test]
    fn no_reporting_line_means_no_loss() {
        let lines = vec!["hello".to_owned(), "done".to_owned()];
        assert_eq!(last_loss(&lines), None);

        let empty: [&str; 0] = [];
        assert_eq!(last_loss(&empty), None);
    }
}
