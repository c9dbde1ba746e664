//! Fixed-width column handling for console listings.
//!
//! The host tool prints sites as a human-formatted table whose column
//! widths vary with the data. The only reliable layout information is the
//! separator row under the header: every maximal run of `-` marks where a
//! column starts. Boundaries are byte offsets into that row; column width
//! is implicit, derived from the gap to the next boundary.

/// Splits raw console output into its non-blank lines, preserving order.
///
/// A line is blank if it is empty after trimming whitespace; blank lines
/// are dropped entirely, not replaced with placeholders.
pub fn normalize_lines(raw: &str) -> Vec<&str> {
    raw.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Locates column start offsets on the separator row.
///
/// Returns one strictly increasing offset per maximal contiguous dash run,
/// each pointing at the run's first character. A row without any dash run
/// yields an empty sequence; the orchestrator decides whether that is an
/// error.
pub fn column_boundaries(separator: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut in_run = false;
    for (offset, byte) in separator.bytes().enumerate() {
        if byte == b'-' {
            if !in_run {
                boundaries.push(offset);
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }
    boundaries
}

/// Slices one data line into trimmed column fields.
///
/// Field `i` spans `line[boundary_i..boundary_{i+1})`; the last field runs
/// to the end of the line. The output length always equals the boundary
/// count: offsets past the end of the line produce empty fields instead of
/// an out-of-range failure, and offsets landing inside a multi-byte
/// character back off to the previous character boundary.
pub fn extract_columns<'a>(line: &'a str, boundaries: &[usize]) -> Vec<&'a str> {
    let mut fields = Vec::with_capacity(boundaries.len());
    for (index, &start) in boundaries.iter().enumerate() {
        let end = boundaries
            .get(index + 1)
            .copied()
            .unwrap_or_else(|| line.len());
        let start = clamp_offset(line, start);
        let end = clamp_offset(line, end);
        fields.push(line[start..end].trim());
    }
    fields
}

fn clamp_offset(line: &str, mut offset: usize) -> usize {
    if offset >= line.len() {
        return line.len();
    }
    while !line.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lines_drops_blank_lines_and_keeps_order() {
        let raw = "first\n\n   \nsecond\r\n\t\nthird\n";
        assert_eq!(normalize_lines(raw), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_normalize_lines_of_empty_input_is_empty() {
        assert!(normalize_lines("").is_empty());
        assert!(normalize_lines("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_boundaries_one_offset_per_dash_run() {
        let separator = "----             --   -----      -------------                  --------";
        let boundaries = column_boundaries(separator);
        assert_eq!(boundaries, vec![0, 17, 22, 33, 64]);
        assert!(boundaries.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_boundaries_ignore_non_dash_noise() {
        assert_eq!(column_boundaries("a-b--c---"), vec![1, 3, 6]);
        assert_eq!(column_boundaries("no dashes here"), Vec::<usize>::new());
        assert_eq!(column_boundaries(""), Vec::<usize>::new());
    }

    #[test]
    fn test_extract_returns_one_trimmed_field_per_boundary() {
        let boundaries = vec![0, 10, 16];
        let fields = extract_columns("alpha     42    Started", &boundaries);
        assert_eq!(fields, vec!["alpha", "42", "Started"]);
    }

    #[test]
    fn test_extract_clamps_short_lines_to_empty_trailing_fields() {
        let boundaries = vec![0, 10, 16];
        let fields = extract_columns("alpha", &boundaries);
        assert_eq!(fields.len(), boundaries.len());
        assert_eq!(fields, vec!["alpha", "", ""]);
    }

    #[test]
    fn test_extract_handles_line_ending_mid_field() {
        let boundaries = vec![0, 10, 16];
        let fields = extract_columns("alpha     42", &boundaries);
        assert_eq!(fields, vec!["alpha", "42", ""]);
    }

    #[test]
    fn test_extract_backs_off_to_char_boundaries() {
        // "münchen" puts a two-byte character at byte offset 1; a boundary
        // at offset 2 would split it.
        let boundaries = vec![0, 2, 9];
        let fields = extract_columns("münchen  x", &boundaries);
        assert_eq!(fields.len(), 3);
        // No panic is the contract; the split lands on the previous
        // character boundary.
        assert_eq!(fields[0], "m");
        assert_eq!(fields[2], "x");
    }
}
