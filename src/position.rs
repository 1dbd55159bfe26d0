//! Byte offset to line/column resolution

/// A resolved source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column
    pub column: usize,
    /// Text of the line, without its line terminator
    pub line_text: String,
}

impl Position {
    fn fallback() -> Self {
        Self {
            line: 1,
            column: 1,
            line_text: String::new(),
        }
    }
}

/// Map a 0-based byte offset in `content` to a 1-based line and column.
///
/// Offsets at or past the end of the content resolve to `(1, 1, "")`; this never fails.
pub fn resolve(content: &[u8], offset: usize) -> Position {
    if offset >= content.len() {
        return Position::fallback();
    }

    let before = &content[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |nl| nl + 1);
    let column = offset - line_start + 1;

    Position {
        line,
        column,
        line_text: line_text(content, line).unwrap_or_default(),
    }
}

/// Text of the 1-based line `line`, or `None` when the document has no such line.
///
/// Lines split on `\n`; a `\r` left over from a `\r\n` terminator is stripped.
pub fn line_text(content: &[u8], line: usize) -> Option<String> {
    if line == 0 {
        return None;
    }
    lines(content)
        .nth(line - 1)
        .map(|text| String::from_utf8_lossy(text).into_owned())
}

/// Iterate the lines of `content` with terminators (`\n` or `\r\n`) removed.
///
/// A final empty segment after a trailing newline is not a line.
pub fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    let has_lines = !content.is_empty();
    body.split(|&b| b == b'\n')
        .take_while(move |_| has_lines)
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}
