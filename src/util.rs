//! Miscellaneous helpers.

use text_size::TextSize;

/// Maps byte offsets into 1-based line/column pairs for diagnostics.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::from(offset as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// Returns the 1-based line and column of a byte offset. Offsets past
    /// the end of the text land on the last line.
    pub fn line_col(&self, offset: TextSize) -> (u32, u32) {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let column = u32::from(offset) - u32::from(self.line_starts[line]);
        (line as u32 + 1, column + 1)
    }
}
