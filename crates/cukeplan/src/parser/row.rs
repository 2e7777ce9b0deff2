//! Table row splitting.

/// Split a `|`-delimited row into trimmed cells.
///
/// Text before the first pipe is ignored, as is blank text after the last
/// one. `\|`, `\\` and `\n` are unescaped; any other backslash is kept.
pub(super) fn split_cells(row: &str) -> Vec<String> {
    let Some(body) = row.trim().strip_prefix('|') else {
        return Vec::new();
    };
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '|' => cells.push(std::mem::take(&mut cell).trim().to_owned()),
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some('\\') => cell.push('\\'),
                Some('n') => cell.push('\n'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            other => cell.push(other),
        }
    }
    let rest = cell.trim();
    if !rest.is_empty() {
        cells.push(rest.to_owned());
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::split_cells;
    use rstest::rstest;

    #[rstest]
    #[case("| a | b |", &["a", "b"])]
    #[case("  |a|b|  ", &["a", "b"])]
    #[case("| | x |", &["", "x"])]
    #[case("| a | b", &["a", "b"])]
    #[case(r"| a \| b | c |", &["a | b", "c"])]
    #[case(r"| back \\ slash |", &[r"back \ slash"])]
    #[case(r"| line\nbreak |", &["line\nbreak"])]
    #[case(r"| \d+ |", &[r"\d+"])]
    #[case("|", &[])]
    fn splits_rows(#[case] row: &str, #[case] expected: &[&str]) {
        assert_eq!(split_cells(row), expected);
    }
}
