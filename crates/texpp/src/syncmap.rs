//! Output line to input line synchronization
//!
//! The [`SyncMap`] records, for every line of an expanded document,
//!     the line of the input document that produced it.
//! It is built by the expander as output is written:
//!     each newline written to the output appends one entry,
//!     and one final entry covers trailing content after the last newline.
//!
//! A newline copied from the input is attributed to the input line it terminates,
//!     which is the line counter of the input cursor minus one once the newline is consumed.
//! Text returned by a module is written once the call and its arguments are consumed;
//!     its newlines are attributed to the line before the cursor's current line,
//!     the last input line completed at that point (at least line 1).

/// Map from 1-based output lines to 1-based input lines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SyncMap(Vec<usize>);

impl SyncMap {
    /// Return the input line that produced the 1-based output line.
    ///
    /// Returns [`None`] for line 0 and for lines past the end of the map.
    pub fn original_line(&self, output_line: usize) -> Option<usize> {
        let index = output_line.checked_sub(1)?;
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Whether no entry is smaller than the entry before it.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl From<Vec<usize>> for SyncMap {
    fn from(lines: Vec<usize>) -> Self {
        SyncMap(lines)
    }
}

/// Output buffer that builds a [`SyncMap`] as text is written.
#[derive(Debug, Default)]
pub(crate) struct Writer {
    text: String,
    lines: Vec<usize>,
}

impl Writer {
    /// Append text produced by the input line `input_line`.
    ///
    /// Each newline in the text completes an output line, which is attributed to `input_line`.
    pub fn write(&mut self, text: &str, input_line: usize) {
        for c in text.chars() {
            self.push(c, input_line);
        }
    }

    pub fn push(&mut self, c: char, input_line: usize) {
        self.text.push(c);
        if c == '\n' {
            self.lines.push(input_line);
        }
    }

    /// Append the entry for trailing content and return the text and map.
    pub fn finish(mut self, final_line: usize) -> (String, SyncMap) {
        self.lines.push(final_line);
        (self.text, SyncMap(self.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_line_is_one_based() {
        let map = SyncMap::from(vec![1, 1, 2, 5]);
        assert_eq!(map.original_line(0), None);
        assert_eq!(map.original_line(1), Some(1));
        assert_eq!(map.original_line(3), Some(2));
        assert_eq!(map.original_line(4), Some(5));
        assert_eq!(map.original_line(5), None);
    }

    #[test]
    fn monotonic() {
        assert!(SyncMap::from(vec![1, 1, 2, 5]).is_monotonic());
        assert!(SyncMap::default().is_monotonic());
        assert!(!SyncMap::from(vec![1, 3, 2]).is_monotonic());
    }

    #[test]
    fn writer_records_one_entry_per_newline() {
        let mut writer = Writer::default();
        writer.write("a\n", 1);
        writer.write("b\nc\n", 2);
        writer.push('d', 3);
        let (text, map) = writer.finish(3);
        assert_eq!(text, "a\nb\nc\nd");
        assert_eq!(map.as_slice(), &[1, 2, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_as_plain_list() {
        let map = SyncMap::from(vec![1, 2, 2]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "[1,2,2]");
        let got: SyncMap = serde_json::from_str(&json).unwrap();
        assert_eq!(got, map);
    }
}
