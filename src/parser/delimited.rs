//! Line splitting for loosely quoted delimited text

use super::Delimiter;

/// Split a line on `delimiter`, but only where the delimiter is followed by
/// a non-whitespace character.
///
/// A delimiter followed by whitespace, or sitting at the end of the line,
/// stays inside the current cell.
pub fn split_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    let sep = delimiter.as_char();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == sep && chars.peek().is_some_and(|next| !next.is_whitespace()) {
            cells.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    cells.push(current);

    cells
}
