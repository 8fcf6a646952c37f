use crate::member::LineOffsets;

/// Byte offsets of lines in the source text
#[derive(Debug, Clone)]
pub struct TextLines<'a> {
    text: &'a str,
    /// Byte offset of the first character of every line
    starts: Vec<usize>,
}

impl<'a> TextLines<'a> {
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self { text, starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    fn line(&self, line: usize) -> Option<(usize, &'a str)> {
        let start = *self.starts.get(line)?;
        let end = self
            .starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        Some((start, &self.text[start..end]))
    }
}

impl LineOffsets for TextLines<'_> {
    fn non_space_start_offset(&self, line: usize) -> usize {
        match self.line(line) {
            Some((start, content)) => {
                start + (content.len() - content.trim_start().len())
            }
            None => self.text.len(),
        }
    }

    fn end_offset(&self, line: usize) -> usize {
        match self.line(line) {
            Some((start, content)) => start + content.trim_end_matches('\r').len(),
            None => self.text.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Problem;

    #[test]
    fn test_offsets() {
        let text = "class Green\n  def red\nend";
        let lines = TextLines::new(text);
        assert_eq!(lines.line_count(), 3);
        assert_eq!(lines.non_space_start_offset(1), 14);
        assert_eq!(lines.end_offset(1), 21);
        assert_eq!(lines.end_offset(2), text.len());
        assert_eq!(lines.non_space_start_offset(9), text.len());
    }

    #[test]
    fn test_offsets_are_bytes() {
        let text = "# café\n  def red\nend";
        let lines = TextLines::new(text);
        let start = lines.non_space_start_offset(1);
        assert_eq!(start, text.find("def").unwrap());
        assert_eq!(&text[start..lines.end_offset(1)], "def red");
    }

    #[test]
    fn test_problem_span() {
        let lines = TextLines::new("a\n   broken\n");
        let span = Problem::error("unexpected end", 1).span(&lines);
        assert_eq!((span.start(), span.end()), (5, 11));
    }
}
