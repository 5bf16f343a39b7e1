//! Character cursor over source code
//!
//! The expander never tokenizes its input up front.
//! It pulls characters one at a time through a [`Cursor`],
//!     looking ahead by a character or two where the syntax needs it.
//!
//! There are two kinds of cursors.
//! A cursor over the input document, created with [`Cursor::new`],
//!     counts lines: every consumed `\n` increments the line number.
//! A *detached* cursor, created with [`Cursor::detached`],
//!     reads from a side buffer such as an argument value or the text returned by a module.
//! Its line number is fixed to the document line where the side buffer came from.
//!
//! Lookahead never changes the line number;
//!     only consuming a newline does.

/// A point in the source that a cursor can be returned to using [`Cursor::seek`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the source.
    pub offset: usize,
    /// 1-based line number at the offset.
    pub line: usize,
}

/// Seekable reader over a string.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: usize,
    counts_lines: bool,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over an input document, starting on line 1.
    pub fn new(source: &'a str) -> Cursor<'a> {
        Cursor {
            source,
            offset: 0,
            line: 1,
            counts_lines: true,
        }
    }

    /// Create a cursor over a side buffer.
    ///
    /// The line number of the cursor is always `line`.
    pub fn detached(source: &'a str, line: usize) -> Cursor<'a> {
        Cursor {
            source,
            offset: 0,
            line,
            counts_lines: false,
        }
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
        }
    }

    /// Return to a position previously obtained from [`Cursor::position`].
    pub fn seek(&mut self, position: Position) {
        self.offset = position.offset;
        self.line = position.line;
    }

    /// Return the source consumed between `position` and the current position.
    pub fn consumed_since(&self, position: Position) -> &'a str {
        &self.source[position.offset..self.offset]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Consume and return the next character.
    ///
    /// Returns [`None`] at the end of the source.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.source[self.offset..].chars().next()?;
        self.offset += c.len_utf8();
        if c == '\n' && self.counts_lines {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume and return the next character if it satisfies the predicate.
    ///
    /// If the character does not satisfy the predicate, or the source is exhausted,
    ///     the cursor does not move.
    pub fn advance_if<F: FnOnce(char) -> bool>(&mut self, predicate: F) -> Option<char> {
        match self.peek() {
            Some(c) if predicate(c) => self.advance(),
            _ => None,
        }
    }

    /// Consume the longest run of characters that satisfy the predicate.
    ///
    /// The first character that does not satisfy the predicate is not consumed.
    pub fn advance_while<F: FnMut(char) -> bool>(&mut self, mut predicate: F) -> &'a str {
        let start = self.position();
        while self.advance_if(&mut predicate).is_some() {}
        self.consumed_since(start)
    }

    /// Return the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    /// Return the next `n` characters without consuming them.
    ///
    /// Fewer than `n` characters are returned near the end of the source.
    pub fn peek_n(&self, n: usize) -> &'a str {
        let rest = &self.source[self.offset..];
        let end = rest
            .char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    }
}
