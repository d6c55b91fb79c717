//! Character cursor for traversing source code.
//!
//! The cursor maintains position state while iterating through source
//! characters. It handles UTF-8 correctly and tracks line/column information
//! for error reporting. The lexer layers token knowledge on top; the cursor
//! itself only knows about characters.

/// A cursor over source text.
///
/// # Example
///
/// ```
/// use pyjs_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("x = 5");
/// assert_eq!(cursor.current_char(), 'x');
/// cursor.advance();
/// assert_eq!(cursor.current_char(), ' ');
/// ```
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    position: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the current character, or `'\0'` at the end of the source.
    #[inline]
    pub fn current_char(&self) -> char {
        self.peek_char(0)
    }

    /// Returns the character `offset` characters ahead of the current
    /// position, or `'\0'` past the end.
    ///
    /// # Example
    ///
    /// ```
    /// use pyjs_lex::cursor::Cursor;
    ///
    /// let cursor = Cursor::new("ab");
    /// assert_eq!(cursor.peek_char(0), 'a');
    /// assert_eq!(cursor.peek_char(1), 'b');
    /// assert_eq!(cursor.peek_char(2), '\0');
    /// ```
    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        if self.position >= self.source.len() {
            return '\0';
        }
        // Fast path for the ASCII-only tail (the common case).
        let bytes = &self.source.as_bytes()[self.position..];
        if offset < bytes.len() && bytes[..=offset].iter().all(|b| *b < 128) {
            return bytes[offset] as char;
        }
        self.source[self.position..]
            .chars()
            .nth(offset)
            .unwrap_or('\0')
    }

    /// Advances the cursor by one character, updating line/column tracking.
    /// Does nothing at the end of the source.
    pub fn advance(&mut self) {
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Returns true if the cursor is at the end of the source.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the current byte position in the source.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the source slice from `start` (a byte position previously
    /// obtained from [`Cursor::position`]) up to the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    /// Saves the cursor state so it can be restored later.
    ///
    /// The lexer uses this to roll back a speculatively consumed character,
    /// e.g. the `.` after `1.` when no digit follows.
    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    /// Restores the cursor to a previously saved snapshot.
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }
}

/// A saved cursor state.
#[derive(Clone, Copy, Debug)]
pub struct CursorSnapshot {
    position: usize,
    line: u32,
    column: u32,
}
