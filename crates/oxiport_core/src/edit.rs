/// Byte span into one version of one document, with the line/column of its
/// start position for display and cursor focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: u32,
    pub end: u32,
    /// 0-based line of `start`
    pub line: u32,
    /// 0-based column of `start`
    pub column: u32,
}

impl SourceSpan {
    pub fn new(src: &str, start: u32, end: u32) -> SourceSpan {
        let (line, column) = line_col(src, start);
        SourceSpan { start, end, line, column }
    }
}

/// 0-based line/column for a byte offset
pub fn line_col(src: &str, offset: u32) -> (u32, u32) {
    let prefix = &src[..(offset as usize).min(src.len())];
    let line = prefix.matches('\n').count() as u32;
    let column = prefix.rfind('\n').map(|i| prefix.len() - i - 1).unwrap_or(prefix.len()) as u32;
    (line, column)
}

/// One replacement of a byte range with new text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

impl TextEdit {
    pub fn insert(at: u32, text: String) -> TextEdit {
        TextEdit { start: at, end: at, text }
    }

    pub fn replace(start: u32, end: u32, text: String) -> TextEdit {
        TextEdit { start, end, text }
    }

    pub fn delete(start: u32, end: u32) -> TextEdit {
        TextEdit { start, end, text: String::new() }
    }
}

/// Apply a batch of non-overlapping edits to a document, returning the new
/// text. Edits are applied back-to-front so recorded offsets stay valid.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| b.start.cmp(&a.start));

    let mut out = text.to_string();
    for edit in sorted {
        let start = edit.start as usize;
        let end = (edit.end as usize).min(out.len());
        out.replace_range(start..end, &edit.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let src = "ab\ncde\nf";
        assert_eq!(line_col(src, 0), (0, 0));
        assert_eq!(line_col(src, 2), (0, 2));
        assert_eq!(line_col(src, 3), (1, 0));
        assert_eq!(line_col(src, 5), (1, 2));
        assert_eq!(line_col(src, 7), (2, 0));
    }

    #[test]
    fn test_apply_single_insert() {
        let out = apply_edits("world", &[TextEdit::insert(0, "hello ".into())]);
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_apply_multiple_edits_offsets_stay_valid() {
        let src = "aaa bbb ccc";
        let edits = vec![
            TextEdit::replace(0, 3, "xx".into()),
            TextEdit::replace(8, 11, "yy".into()),
        ];
        assert_eq!(apply_edits(src, &edits), "xx bbb yy");
    }

    #[test]
    fn test_apply_delete() {
        let out = apply_edits("one two three", &[TextEdit::delete(3, 7)]);
        assert_eq!(out, "one three");
    }
}
